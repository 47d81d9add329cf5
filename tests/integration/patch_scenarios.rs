//! Integration tests for patch calculation between trees

use std::time::{Duration, UNIX_EPOCH};
use treepatch::{Entry, FsTree, Operation, TreeOptions};

fn ops(ours: &FsTree, theirs: &FsTree) -> Vec<(Operation, String)> {
    ours.calculate_patch(theirs)
        .into_iter()
        .map(|op| (op.operation, op.path))
        .collect()
}

fn tree(entries: Vec<Entry>) -> FsTree {
    FsTree::from_entries(entries, TreeOptions::sorted()).unwrap()
}

/// A changed file size yields a single change
#[test]
fn test_file_size_change() {
    let a = tree(vec![
        Entry::from_path("a/"),
        Entry::new("a/file.js", 10, UNIX_EPOCH, None),
    ]);
    let b = tree(vec![
        Entry::from_path("a/"),
        Entry::new("a/file.js", 20, UNIX_EPOCH, None),
    ]);

    assert_eq!(ops(&a, &b), vec![(Operation::Change, "a/file.js".to_string())]);
}

/// Removing a nested tree removes leaves first and ancestors last
#[test]
fn test_remove_nested_tree() {
    let a = FsTree::from_paths(["a/", "a/b/", "a/b/c.js"], TreeOptions::sorted()).unwrap();
    let b = tree(vec![]);

    assert_eq!(
        ops(&a, &b),
        vec![
            (Operation::Unlink, "a/b/c.js".to_string()),
            (Operation::Rmdir, "a/b".to_string()),
            (Operation::Rmdir, "a".to_string()),
        ]
    );
}

/// Creating a nested tree creates ancestors first
#[test]
fn test_create_nested_tree() {
    let a = tree(vec![]);
    let b = FsTree::from_paths(["x/", "x/y.js"], TreeOptions::sorted()).unwrap();

    assert_eq!(
        ops(&a, &b),
        vec![
            (Operation::Mkdir, "x".to_string()),
            (Operation::Create, "x/y.js".to_string()),
        ]
    );
}

/// Directories with drifting metadata never produce a change
#[test]
fn test_directory_metadata_drift_ignored() {
    let a = tree(vec![Entry::with_mode("d/", 0o040755, 1, UNIX_EPOCH, None)]);
    let b = tree(vec![Entry::with_mode(
        "d/",
        0o040700,
        2,
        UNIX_EPOCH + Duration::from_secs(1),
        None,
    )]);

    assert!(ops(&a, &b).is_empty());
}

/// Sibling subtrees: removals of one subtree do not wait on unrelated adds
#[test]
fn test_replace_subtree() {
    let a = FsTree::from_paths(["lib/a.js", "lib/b.js", "main.js"], TreeOptions::expanded())
        .unwrap();
    let b = FsTree::from_paths(["main.js", "src/a.js"], TreeOptions::expanded()).unwrap();

    assert_eq!(
        ops(&a, &b),
        vec![
            (Operation::Unlink, "lib/a.js".to_string()),
            (Operation::Unlink, "lib/b.js".to_string()),
            (Operation::Mkdir, "src".to_string()),
            (Operation::Create, "src/a.js".to_string()),
            (Operation::Rmdir, "lib".to_string()),
        ]
    );
}

/// The patch of a tree against itself is empty
#[test]
fn test_self_patch_is_empty() {
    let a = FsTree::from_paths(["a/b/c.js", "d.js", "e/"], TreeOptions::expanded()).unwrap();
    assert!(a.calculate_patch(&a).is_empty());
}

/// Custom equality may force directory updates, emitted deepest first
#[test]
fn test_custom_equality() {
    let a = FsTree::from_paths(["a/", "a/b/"], TreeOptions::sorted()).unwrap();
    let b = FsTree::from_paths(["a/", "a/b/"], TreeOptions::sorted()).unwrap();

    let patch = a.calculate_patch_with(&b, |_, _| false);
    let paths: Vec<_> = patch.iter().map(|op| op.path.as_str()).collect();
    assert_eq!(paths, vec!["a/b", "a"]);
    assert!(patch.iter().all(|op| op.operation == Operation::Change));
}
