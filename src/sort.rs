//! Sortedness enforcement for entry lists
//!
//! Every tree holds its entries strictly ascending by relative path with no
//! duplicates. Lists handed in by callers either get validated against that
//! invariant or normalized into it.

use crate::entry::Entry;
use crate::error::TreeError;
use crate::path;
use std::collections::BTreeMap;
use tracing::trace;

/// Directory mode bits must agree with the trailing `/` of the path
fn check_mode(entry: &Entry) -> Result<(), TreeError> {
    if entry.is_directory() != path::is_directory_path(entry.relative_path()) {
        return Err(TreeError::ModeMismatch(entry.relative_path().to_string()));
    }
    Ok(())
}

/// Check that `entries` are strictly ascending by path
pub fn validate_sorted_unique(entries: &[Entry]) -> Result<(), TreeError> {
    entries.iter().try_for_each(check_mode)?;
    for pair in entries.windows(2) {
        let previous = pair[0].relative_path();
        let current = pair[1].relative_path();
        if previous == current {
            return Err(TreeError::DuplicatePath(current.to_string()));
        }
        if previous > current {
            return Err(TreeError::Unsorted {
                previous: previous.to_string(),
                current: current.to_string(),
            });
        }
    }
    Ok(())
}

/// Sort entries by path and add any implied parent directories
///
/// A missing parent is synthesized as a directory entry with zero size and
/// epoch mtime. Two supplied entries sharing a path are rejected, as is an
/// entry whose mode disagrees with its trailing `/`.
pub fn sort_and_expand(entries: Vec<Entry>) -> Result<Vec<Entry>, TreeError> {
    let mut by_path: BTreeMap<String, Entry> = BTreeMap::new();

    for entry in entries {
        check_mode(&entry)?;
        let key = entry.relative_path().to_string();
        if by_path.insert(key.clone(), entry).is_some() {
            return Err(TreeError::DuplicatePath(key));
        }
    }

    let implied: Vec<String> = by_path
        .keys()
        .flat_map(|key| path::ancestor_directories(key))
        .filter(|ancestor| !by_path.contains_key(ancestor))
        .collect();

    for ancestor in implied {
        trace!(path = %ancestor, "Adding implied directory");
        by_path
            .entry(ancestor.clone())
            .or_insert_with(|| Entry::from_path(ancestor));
    }

    Ok(by_path.into_values().collect())
}
