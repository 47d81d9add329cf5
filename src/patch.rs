//! Patch calculation between two sorted entry sequences
//!
//! [`calculate_patch`] walks both sequences once with a cursor each, the way
//! a merge step walks two sorted runs. Paths that only exist on our side are
//! removed, paths that only exist on their side are added, and shared paths
//! are updated when the equality predicate says they differ.
//!
//! File removals, additions and file updates are emitted in forward path
//! order. Commands that affect directories (directory removals and directory
//! updates) are collected separately and emitted afterwards in reverse, so a
//! directory is always handled after everything beneath it.

use crate::entry::Entry;
use crate::fs::FileSystem;
use crate::path;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Kind of a patch or change-log operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Change,
    Unlink,
    Mkdir,
    Rmdir,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Change => "change",
            Operation::Unlink => "unlink",
            Operation::Mkdir => "mkdir",
            Operation::Rmdir => "rmdir",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(operation, path, entry)` step of a patch
///
/// `path` is the entry's relative path without the directory marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub operation: Operation,
    pub path: String,
    pub entry: Arc<Entry>,
}

impl PatchOperation {
    pub fn new(operation: Operation, entry: Arc<Entry>) -> Self {
        Self {
            operation,
            path: path::strip_trailing_slash(entry.relative_path()).to_string(),
            entry,
        }
    }
}

/// Ordered operations transforming one snapshot into another
pub type Patch = Vec<PatchOperation>;

/// Default equality between two entries at the same path
///
/// Two directories are always equal. Anything else is equal when size, mtime
/// (in whole milliseconds) and mode all match. Checksums are not consulted.
pub fn default_is_equal(ours: &Entry, theirs: &Entry) -> bool {
    if ours.is_directory() && theirs.is_directory() {
        return true;
    }
    ours.size() == theirs.size()
        && ours.mtime_ms() == theirs.mtime_ms()
        && ours.mode() == theirs.mode()
}

/// Content equality using checksums when both entries carry one
///
/// Directories are always equal. Files with checksums on both sides compare
/// by checksum and mode; otherwise this falls back to [`default_is_equal`].
pub fn checksum_is_equal(ours: &Entry, theirs: &Entry) -> bool {
    if ours.is_directory() && theirs.is_directory() {
        return true;
    }
    match (ours.checksum(), theirs.checksum()) {
        (Some(a), Some(b)) => a == b && ours.mode() == theirs.mode(),
        _ => default_is_equal(ours, theirs),
    }
}

fn remove_command(entry: &Arc<Entry>) -> PatchOperation {
    let operation = if entry.is_directory() {
        Operation::Rmdir
    } else {
        Operation::Unlink
    };
    PatchOperation::new(operation, Arc::clone(entry))
}

fn add_command(entry: &Arc<Entry>) -> PatchOperation {
    let operation = if entry.is_directory() {
        Operation::Mkdir
    } else {
        Operation::Create
    };
    PatchOperation::new(operation, Arc::clone(entry))
}

fn update_command(entry: &Arc<Entry>) -> PatchOperation {
    PatchOperation::new(Operation::Change, Arc::clone(entry))
}

/// Calculate the patch that turns `ours` into `theirs`
///
/// Both slices must be strictly ascending by relative path. The result is
/// the forward operations followed by the deferred directory operations in
/// reverse order.
#[instrument(skip_all, fields(ours = ours.len(), theirs = theirs.len()))]
pub fn calculate_patch<F>(ours: &[Arc<Entry>], theirs: &[Arc<Entry>], is_equal: F) -> Patch
where
    F: Fn(&Entry, &Entry) -> bool,
{
    let mut operations: Patch = Vec::new();
    let mut removals: Patch = Vec::new();

    let mut defer_or_push = |command: PatchOperation, deferred: bool| {
        if deferred {
            removals.push(command);
        } else {
            operations.push(command);
        }
    };

    let mut i = 0;
    let mut j = 0;

    while i < ours.len() && j < theirs.len() {
        let x = &ours[i];
        let y = &theirs[j];

        match x.relative_path().cmp(y.relative_path()) {
            Ordering::Less => {
                i += 1;
                defer_or_push(remove_command(x), x.is_directory());
            }
            Ordering::Greater => {
                j += 1;
                defer_or_push(add_command(y), false);
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
                if !is_equal(x, y) {
                    trace!(path = %y.relative_path(), "Entry differs");
                    defer_or_push(update_command(y), x.is_directory());
                }
            }
        }
    }

    for x in &ours[i..] {
        defer_or_push(remove_command(x), x.is_directory());
    }

    for y in &theirs[j..] {
        defer_or_push(add_command(y), false);
    }

    removals.reverse();
    operations.extend(removals);

    debug!(operation_count = operations.len(), "Patch calculated");
    operations
}

/// Apply `patch` to `output_root`, reading file content from `input_root`
///
/// `create` and `change` copy the file from the input root, `unlink` and
/// `rmdir` remove from the output root, `mkdir` creates the directory there.
/// A `change` on a directory leaves the existing directory in place.
/// The first storage error stops application and is returned as is.
pub fn apply_patch<S: FileSystem + ?Sized>(
    input_root: &Path,
    output_root: &Path,
    patch: &[PatchOperation],
    fs: &S,
) -> std::io::Result<()> {
    for step in patch {
        let output_path = output_root.join(&step.path);
        debug!(operation = %step.operation, path = %step.path, "Applying patch operation");
        match step.operation {
            Operation::Change if step.entry.is_directory() => {
                trace!(path = %step.path, "Directory change has no content to copy");
            }
            Operation::Create | Operation::Change => {
                fs.copy(&input_root.join(&step.path), &output_path)?;
            }
            Operation::Unlink => fs.remove_file(&output_path)?,
            Operation::Mkdir => fs.create_dir(&output_path)?,
            Operation::Rmdir => fs.remove_dir(&output_path)?,
        }
    }
    Ok(())
}
