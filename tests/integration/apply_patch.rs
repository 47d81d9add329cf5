//! Integration tests applying patches to real directories

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use treepatch::{apply_patch, Entry, FsTree, LocalFileSystem, Operation, TreeOptions};

fn snapshot(root: &Path) -> FsTree {
    let mut entries = Vec::new();
    collect(root, root, &mut entries);
    FsTree::from_entries(entries, TreeOptions::expanded()).unwrap()
}

fn collect(root: &Path, dir: &Path, entries: &mut Vec<Entry>) {
    for item in fs::read_dir(dir).unwrap() {
        let item = item.unwrap();
        let path = item.path();
        let relative = path.strip_prefix(root).unwrap().to_string_lossy().to_string();
        let metadata = item.metadata().unwrap();
        entries.push(Entry::from_metadata(&relative, &metadata).unwrap());
        if metadata.is_dir() {
            collect(root, &path, entries);
        }
    }
}

/// Applying the patch between two directories makes the output match the input
#[test]
fn test_apply_patch_mirrors_input() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    fs::create_dir_all(input.path().join("src/nested")).unwrap();
    fs::write(input.path().join("src/nested/a.js"), "a").unwrap();
    fs::write(input.path().join("README"), "readme").unwrap();

    fs::create_dir_all(output.path().join("old/deeper")).unwrap();
    fs::write(output.path().join("old/deeper/x.js"), "x").unwrap();
    fs::write(output.path().join("README"), "stale").unwrap();

    let ours = snapshot(output.path());
    let theirs = snapshot(input.path());
    let patch = ours.calculate_patch(&theirs);

    apply_patch(input.path(), output.path(), &patch, &LocalFileSystem).unwrap();

    assert!(!output.path().join("old").exists());
    assert_eq!(
        fs::read_to_string(output.path().join("src/nested/a.js")).unwrap(),
        "a"
    );
    assert_eq!(fs::read_to_string(output.path().join("README")).unwrap(), "readme");
}

/// calculate_and_apply_patch returns the patch it applied
#[test]
fn test_calculate_and_apply_patch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::create_dir(input.path().join("d")).unwrap();
    fs::write(input.path().join("d/f.txt"), "f").unwrap();

    let ours = FsTree::from_paths(Vec::<&str>::new(), TreeOptions::sorted()).unwrap();
    let theirs = FsTree::from_paths(["d/", "d/f.txt"], TreeOptions::sorted()).unwrap();

    let patch = ours
        .calculate_and_apply_patch(&theirs, input.path(), output.path())
        .unwrap();

    assert_eq!(patch.len(), 2);
    assert_eq!(fs::read_to_string(output.path().join("d/f.txt")).unwrap(), "f");
}

/// Storage errors stop application and surface unchanged
#[test]
fn test_apply_patch_propagates_errors() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let ours = FsTree::from_paths(["gone.txt"], TreeOptions::sorted()).unwrap();
    let theirs = FsTree::from_paths(Vec::<&str>::new(), TreeOptions::sorted()).unwrap();
    let patch = ours.calculate_patch(&theirs);

    let err = apply_patch(input.path(), output.path(), &patch, &LocalFileSystem).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

/// A directory reported as changed stays in place with its contents
#[test]
fn test_apply_patch_directory_change() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::create_dir(input.path().join("d")).unwrap();
    fs::create_dir(output.path().join("d")).unwrap();
    fs::write(output.path().join("d/kept.txt"), "kept").unwrap();

    let ours = FsTree::from_paths(["d/"], TreeOptions::sorted()).unwrap();
    let theirs = FsTree::from_paths(["d/"], TreeOptions::sorted()).unwrap();
    let patch = ours.calculate_patch_with(&theirs, |_, _| false);
    assert_eq!(patch.len(), 1);
    assert_eq!(patch[0].operation, Operation::Change);

    apply_patch(input.path(), output.path(), &patch, &LocalFileSystem).unwrap();

    assert!(output.path().join("d").is_dir());
    assert_eq!(fs::read_to_string(output.path().join("d/kept.txt")).unwrap(), "kept");
}
