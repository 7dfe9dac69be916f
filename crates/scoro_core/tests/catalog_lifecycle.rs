use scoro_core::{Catalog, CatalogConfig, CatalogError, Tag, TagFilter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup() -> (TempDir, CatalogConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = CatalogConfig::rooted_at(dir.path());
    (dir, config)
}

fn touch_storage(config: &CatalogConfig, names: &[&str]) {
    fs::create_dir_all(&config.storage_dir).unwrap();
    for name in names {
        fs::write(config.storage_dir.join(name), "").unwrap();
    }
}

fn ledger_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn new_category_survives_settle_and_fresh_open_with_empty_ledger() {
    let (_dir, config) = setup();
    {
        let mut catalog = Catalog::open(&config).unwrap();
        assert_eq!(catalog.add_category("colour", None).unwrap(), 1);
        catalog.reconcile().unwrap();
        catalog.settle().unwrap();
    }

    let reopened = Catalog::open(&config).unwrap();
    let colour = reopened.category("colour").unwrap();
    assert_eq!(colour.rank(), 1);
    assert!(colour.is_empty());
    assert_eq!(ledger_text(colour.ledger_path()), "");
    assert!(config.ledger_dir.join("colour_1.lst").exists());
}

#[test]
fn add_category_is_idempotent_ignoring_case() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();

    assert_eq!(catalog.add_category("Colour", None).unwrap(), 1);
    assert_eq!(catalog.add_category("colour", None).unwrap(), 0);
    assert_eq!(catalog.add_category(["COLOUR", "size"], None).unwrap(), 1);
    assert_eq!(catalog.category_titles(), vec!["Colour", "size"]);
}

#[test]
fn deleted_rank_is_reused_by_next_category() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog
        .add_category(["colour", "size", "shape"], None)
        .unwrap();
    assert_eq!(catalog.category("shape").unwrap().rank(), 3);

    assert!(catalog.delete_category("size").unwrap());
    assert!(!config.ledger_dir.join("size_2.lst").exists());

    catalog.add_category("material", None).unwrap();
    assert_eq!(catalog.category("material").unwrap().rank(), 2);
    assert_eq!(catalog.category_by_rank(2).unwrap().title(), "material");
}

#[test]
fn deleting_unknown_category_reports_failure_and_changes_nothing() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category(["colour", "size"], None).unwrap();

    assert!(!catalog.delete_category("shape").unwrap());
    assert_eq!(catalog.category_titles(), vec!["colour", "size"]);
    assert!(config.ledger_dir.join("colour_1.lst").exists());
    assert!(config.ledger_dir.join("size_2.lst").exists());
}

#[test]
fn delete_accepts_ledger_stem_and_continues_batch() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category(["colour", "size"], None).unwrap();

    let all_deleted = catalog.delete_category(["missing", "colour_1"]).unwrap();
    assert!(!all_deleted);
    assert_eq!(catalog.category_titles(), vec!["size"]);
}

#[test]
fn reconcile_adds_storage_tokens_as_handled_and_keeps_pending_tags() {
    let (_dir, config) = setup();
    touch_storage(
        &config,
        &["red_small.txt", "blue_large.png", "red_large.txt", "green_tiny_extra.txt"],
    );
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category(["colour", "size"], None).unwrap();
    catalog.add_tags("colour", ["red", "purple"], false);
    catalog.settle().unwrap();

    let report = catalog.reconcile().unwrap();
    assert_eq!(report.storage_files, 4);
    // "red" was already pending; blue and green are new.
    assert_eq!(
        catalog.query("colour", TagFilter::all()),
        vec!["blue", "green", "purple", "red"]
    );
    assert_eq!(
        catalog.query("colour", TagFilter::unchecked_only()),
        vec!["purple", "red"]
    );
    assert_eq!(
        catalog.query("size", TagFilter::checked_only()),
        vec!["large", "small", "tiny"]
    );
}

#[test]
fn reconcile_reloads_ledgers_and_drops_unsettled_tags() {
    let (_dir, config) = setup();
    touch_storage(&config, &["red_small.txt"]);
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category("colour", None).unwrap();
    catalog.add_tags("colour", ["blue"], false);
    catalog.settle().unwrap();
    catalog.add_tags("colour", ["purple"], false);

    catalog.reconcile().unwrap();
    assert_eq!(catalog.query("colour", TagFilter::all()), vec!["blue", "red"]);
    assert_eq!(
        catalog.query("colour", TagFilter::unchecked_only()),
        vec!["blue"]
    );
}

#[test]
fn reconcile_discovers_ledgers_with_rank_from_file_name() {
    let (_dir, config) = setup();
    fs::create_dir_all(&config.ledger_dir).unwrap();
    fs::write(config.ledger_dir.join("size_2.lst"), "small\n;large\n").unwrap();
    fs::write(config.ledger_dir.join("notes.txt"), "ignored\n").unwrap();

    let catalog = Catalog::open(&config).unwrap();
    assert_eq!(catalog.len(), 1);
    let size = catalog.category_by_rank(2).unwrap();
    assert_eq!(size.title(), "size");
    assert_eq!(size.query(TagFilter::unchecked_only()), vec!["small"]);
    assert_eq!(size.query(TagFilter::checked_only()), vec!["large"]);
}

#[test]
fn settle_twice_produces_identical_bytes() {
    let (_dir, config) = setup();
    touch_storage(&config, &["red_small.txt", "blue_large.txt"]);
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category(["colour", "size"], None).unwrap();
    catalog.reconcile().unwrap();
    catalog.add_tags("colour", ["zebra", "amber"], false);

    catalog.settle().unwrap();
    let colour_path = config.ledger_dir.join("colour_1.lst");
    let size_path = config.ledger_dir.join("size_2.lst");
    let first = (fs::read(&colour_path).unwrap(), fs::read(&size_path).unwrap());

    catalog.settle().unwrap();
    let second = (fs::read(&colour_path).unwrap(), fs::read(&size_path).unwrap());
    assert_eq!(first, second);
    assert_eq!(ledger_text(&colour_path), "amber\n;blue\n;red\nzebra\n");
}

#[test]
fn reset_marks_everything_handled_without_deleting() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category("colour", None).unwrap();
    catalog.add_tags("colour", ["red", "blue"], false);

    catalog.reset();
    assert!(catalog.query("colour", TagFilter::unchecked_only()).is_empty());
    assert_eq!(catalog.query("colour", TagFilter::all()), vec!["blue", "red"]);
}

#[test]
fn catalog_wide_uncheck_reaches_every_category() {
    let (_dir, config) = setup();
    touch_storage(&config, &["red_red.txt"]);
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category(["colour", "accent"], None).unwrap();
    catalog.reconcile().unwrap();

    assert_eq!(catalog.uncheck("red", None), 2);
    assert_eq!(catalog.check("red", Some("accent")), 1);
    assert_eq!(catalog.query("colour", TagFilter::unchecked_only()), vec!["red"]);
    assert!(catalog.query("accent", TagFilter::unchecked_only()).is_empty());
}

#[test]
fn clear_all_truncates_ledgers_immediately() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category("colour", None).unwrap();
    catalog.add_tags("colour", ["red"], true);
    catalog.settle().unwrap();
    let path = config.ledger_dir.join("colour_1.lst");
    assert_eq!(ledger_text(&path), ";red\n");

    catalog.clear_all().unwrap();
    assert_eq!(ledger_text(&path), "");
    assert!(catalog.category("colour").unwrap().is_empty());
}

#[test]
fn with_settle_flushes_on_error_path() {
    let (_dir, config) = setup();
    let mut catalog = Catalog::open(&config).unwrap();
    catalog.add_category("colour", None).unwrap();

    let outcome: Result<(), CatalogError> = catalog.with_settle(|catalog| {
        catalog.add_tags("colour", ["red"], false);
        Err(CatalogError::Config("stop".to_string()))
    });
    assert!(outcome.is_err());
    assert_eq!(ledger_text(&config.ledger_dir.join("colour_1.lst")), "red\n");
}

#[test]
fn open_without_reconcile_only_reloads_ledgers() {
    let (_dir, mut config) = setup();
    config.initial_titles = vec!["colour".to_string()];
    config.reconcile_on_open = false;
    touch_storage(&config, &["red_small.txt"]);

    let catalog = Catalog::open(&config).unwrap();
    assert!(catalog.category("colour").unwrap().is_empty());

    config.reconcile_on_open = true;
    let reconciled = Catalog::open(&config).unwrap();
    assert_eq!(
        reconciled.category("colour").unwrap().tags(),
        &[Tag::handled("red")]
    );
}

#[test]
fn malformed_ledger_duplicates_do_not_multiply_output() {
    let (_dir, config) = setup();
    fs::create_dir_all(&config.ledger_dir).unwrap();
    let path = config.ledger_dir.join("colour_1.lst");
    fs::write(&path, "red\nred\n;blue\nred\n").unwrap();

    let mut catalog = Catalog::open(&config).unwrap();
    let words = catalog.category("colour").unwrap().sorted_words();
    assert_eq!(words, vec!["blue", "red"]);

    catalog.settle().unwrap();
    assert_eq!(ledger_text(&path).lines().count(), 2);
}
