//! Gap-filling rank allocation.

/// Returns the smallest rank `>= 1` not present in `used`.
///
/// Freed ranks are reused before the range grows.
pub fn next_free_rank<I>(used: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let mut taken: Vec<u32> = used.into_iter().filter(|rank| *rank > 0).collect();
    taken.sort_unstable();
    taken.dedup();

    let mut candidate = 1;
    for rank in taken {
        if rank != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}
