//! Integration tests for tree mutations, change tracking and lifecycle

use std::fs;
use tempfile::TempDir;
use treepatch::{FilterOptions, FsTree, Operation, TreeError, TreeOptions};

/// Mutations recorded on one tree produce the same patch as diffing snapshots
#[test]
fn test_changes_match_calculated_patch() {
    let temp_dir = TempDir::new().unwrap();
    let mut tree = FsTree::new(Some(temp_dir.path().to_path_buf()));
    tree.mkdir("src").unwrap();
    tree.write_file("src/a.js", b"a").unwrap();
    tree.write_file("src/b.js", b"b").unwrap();

    let before = FsTree::from_entries(
        tree.iter().map(|e| (**e).clone()).collect(),
        TreeOptions::sorted(),
    )
    .unwrap();
    tree.start().unwrap();

    tree.write_file("src/a.js", b"changed").unwrap();
    tree.unlink("src/b.js").unwrap();
    tree.write_file("src/c.js", b"c").unwrap();

    let patch = before.calculate_patch(&tree);
    let from_patch: Vec<_> = patch.iter().map(|op| (op.operation, op.path.clone())).collect();
    let mut from_changes: Vec<_> = tree
        .all_changes()
        .iter()
        .map(|c| (c.operation, c.path.clone()))
        .collect();
    from_changes.sort_by(|a, b| a.1.cmp(&b.1));

    assert_eq!(from_patch, from_changes);
}

/// A stopped tree leaves the filesystem untouched
#[test]
fn test_stop_is_terminal() {
    let temp_dir = TempDir::new().unwrap();
    let mut tree = FsTree::new(Some(temp_dir.path().to_path_buf()));
    tree.write_file("a.txt", b"1").unwrap();
    tree.stop();

    let err = tree.write_file("a.txt", b"2").unwrap_err();
    assert!(matches!(err, TreeError::Stopped { operation: "write_file" }));
    assert_eq!(fs::read(temp_dir.path().join("a.txt")).unwrap(), b"1");
    assert!(tree.start().is_err());
    assert_eq!(tree.all_changes().len(), 1);
}

/// Glob filters scope both entries and changes
#[test]
fn test_glob_scoped_changes() {
    let temp_dir = TempDir::new().unwrap();
    let mut tree = FsTree::new(Some(temp_dir.path().to_path_buf()));
    tree.mkdir("css").unwrap();
    tree.mkdir("js").unwrap();
    tree.write_file("css/site.css", b"body{}").unwrap();
    tree.write_file("js/app.js", b"1").unwrap();

    let js_only = FilterOptions::include(["js/**"]);
    let changes = tree.changes(&js_only).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].path, "js/app.js");
    assert_eq!(changes[0].operation, Operation::Create);

    let not_css = FilterOptions::default().with_exclude(["css", "css/**"]);
    let entries = tree.match_entries(&not_css).unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.relative_path()).collect();
    assert_eq!(paths, vec!["js/", "js/app.js"]);
}

/// Rewriting identical content is not a change
#[test]
fn test_write_dedup() {
    let temp_dir = TempDir::new().unwrap();
    let mut tree = FsTree::new(Some(temp_dir.path().to_path_buf()));
    assert_eq!(tree.write_file("a.txt", b"x").unwrap(), Some(Operation::Create));
    assert_eq!(tree.write_file("a.txt", b"x").unwrap(), None);
    assert_eq!(tree.all_changes().len(), 1);
}
