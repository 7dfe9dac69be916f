//! Plain-text rendering of category summaries.

use scoro_core::CategorySummary;

const WORDS_PER_LINE: usize = 4;

/// Renders a header line followed by the words, four per line.
pub fn render_summary(summary: &CategorySummary) -> String {
    let mut out = format!(
        "{} (rank {}, {} tags)\n",
        summary.title, summary.rank, summary.count
    );
    for chunk in summary.words.chunks(WORDS_PER_LINE) {
        out.push_str("  ");
        out.push_str(&chunk.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_summary;
    use scoro_core::CategorySummary;

    #[test]
    fn words_wrap_four_per_line() {
        let words: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|word| word.to_string())
            .collect();
        let summary = CategorySummary {
            title: "colour".to_string(),
            rank: 1,
            count: words.len(),
            words,
        };
        assert_eq!(
            render_summary(&summary),
            "colour (rank 1, 5 tags)\n  a b c d\n  e\n"
        );
    }

    #[test]
    fn empty_category_renders_header_only() {
        let summary = CategorySummary {
            title: "size".to_string(),
            rank: 2,
            words: Vec::new(),
            count: 0,
        };
        assert_eq!(render_summary(&summary), "size (rank 2, 0 tags)\n");
    }
}
