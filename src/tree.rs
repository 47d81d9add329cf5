//! Tree container: one sorted snapshot of a directory tree
//!
//! [`FsTree`] owns a strictly ascending, duplicate-free sequence of entries
//! and mirrors mutations onto a real directory through a [`FileSystem`].
//! Every mutation is recorded in the tree's change log, keeping only the
//! latest operation per path in first-touch order.

use crate::entry::Entry;
use crate::error::TreeError;
use crate::filter::FilterOptions;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::hasher::compute_checksum;
use crate::patch::{self, Operation, Patch, PatchOperation};
use crate::path;
use crate::sort;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, trace};

/// Lifecycle of a tree container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Started,
    Stopped,
}

/// Construction options for [`FsTree`]
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Sort the supplied entries and add implied parent directories instead
    /// of requiring an already sorted, duplicate-free list
    pub sort_and_expand: bool,
    /// Directory that mutations are mirrored to
    pub root: Option<PathBuf>,
}

impl TreeOptions {
    pub fn sorted() -> Self {
        Self::default()
    }

    pub fn expanded() -> Self {
        Self {
            sort_and_expand: true,
            root: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

/// A recorded mutation; same shape as a patch step
pub type Change = PatchOperation;

/// Mutations since the tree was last started, one record per path
#[derive(Debug, Default)]
struct ChangeLog {
    records: Vec<Change>,
    index: HashMap<String, usize>,
}

impl ChangeLog {
    fn track(&mut self, operation: Operation, entry: Arc<Entry>) {
        let record = Change::new(operation, entry);
        match self.index.get(&record.path) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.path.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}

/// Sorted snapshot of a directory tree with change tracking
pub struct FsTree<S: FileSystem = LocalFileSystem> {
    entries: Vec<Arc<Entry>>,
    root: Option<PathBuf>,
    changes: ChangeLog,
    state: LifecycleState,
    fs: S,
}

impl FsTree<LocalFileSystem> {
    /// Empty tree, optionally rooted at a directory
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            root,
            changes: ChangeLog::default(),
            state: LifecycleState::Started,
            fs: LocalFileSystem,
        }
    }

    /// Build a tree from prepared entries
    ///
    /// Without `sort_and_expand` the entries must already be strictly
    /// ascending by path.
    pub fn from_entries(entries: Vec<Entry>, options: TreeOptions) -> Result<Self, TreeError> {
        let entries = if options.sort_and_expand {
            sort::sort_and_expand(entries)?
        } else {
            sort::validate_sorted_unique(&entries)?;
            entries
        };
        debug!(entry_count = entries.len(), "Built tree from entries");

        let mut tree = Self::new(options.root);
        tree.entries = entries.into_iter().map(Arc::new).collect();
        Ok(tree)
    }

    /// Build a tree from relative paths; a trailing `/` marks a directory
    ///
    /// Every entry gets zero size and an epoch mtime.
    pub fn from_paths<I, P>(paths: I, options: TreeOptions) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let entries = paths
            .into_iter()
            .map(|p| Entry::from_path(path::normalize_relative_path(p.as_ref())))
            .collect();
        Self::from_entries(entries, options)
    }
}

impl<S: FileSystem> FsTree<S> {
    /// Swap the storage layer used by mutations
    pub fn with_file_system<T: FileSystem>(self, fs: T) -> FsTree<T> {
        FsTree {
            entries: self.entries,
            root: self.root,
            changes: self.changes,
            state: self.state,
            fs,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Arc<Entry>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.iter()
    }

    /// Relative paths of all entries, in order
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.relative_path()).collect()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Look up an entry and its index
    ///
    /// A path without a trailing `/` also finds the directory of that name.
    pub fn find_by_path(&self, relative_path: &str) -> Option<(usize, &Arc<Entry>)> {
        let normalized = path::normalize_relative_path(relative_path);
        self.position(&normalized)
            .or_else(|| {
                if path::is_directory_path(&normalized) {
                    None
                } else {
                    self.position(&format!("{}/", normalized))
                }
            })
            .map(|index| (index, &self.entries[index]))
    }

    /// Entry at `relative_path`, if any
    pub fn stat(&self, relative_path: &str) -> Option<&Arc<Entry>> {
        self.find_by_path(relative_path).map(|(_, entry)| entry)
    }

    pub fn exists(&self, relative_path: &str) -> bool {
        self.find_by_path(relative_path).is_some()
    }

    /// Reset the change log
    ///
    /// A stopped tree cannot be started again.
    pub fn start(&mut self) -> Result<(), TreeError> {
        self.ensure_started("start")?;
        self.changes.clear();
        Ok(())
    }

    /// Stop the tree; every later mutation fails
    pub fn stop(&mut self) {
        info!(change_count = self.changes.records.len(), "Stopping tree");
        self.state = LifecycleState::Stopped;
    }

    /// All recorded changes in first-touch order
    pub fn all_changes(&self) -> &[Change] {
        &self.changes.records
    }

    /// Recorded changes whose paths pass `filter`
    pub fn changes(&self, filter: &FilterOptions) -> Result<Vec<Change>, TreeError> {
        let matcher = filter.compile()?;
        Ok(self
            .changes
            .records
            .iter()
            .filter(|change| matcher.is_match(&change.path))
            .cloned()
            .collect())
    }

    /// Entries whose paths pass `filter`
    pub fn match_entries(&self, filter: &FilterOptions) -> Result<Vec<Arc<Entry>>, TreeError> {
        let matcher = filter.compile()?;
        Ok(self.filter(|entry| matcher.is_match(entry.relative_path())))
    }

    pub fn filter<P>(&self, mut predicate: P) -> Vec<Arc<Entry>>
    where
        P: FnMut(&Entry) -> bool,
    {
        self.entries
            .iter()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect()
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Arc<Entry>),
    {
        self.entries.iter().for_each(f);
    }

    /// Read file content from the tree's root
    pub fn read_file(&self, relative_path: &str) -> Result<Vec<u8>, TreeError> {
        let full_path = self.full_path("read_file", relative_path)?;
        Ok(self.fs.read(&full_path)?)
    }

    /// Create or update a file
    ///
    /// Writing content whose checksum matches the current entry is a no-op
    /// and returns `None`. Otherwise returns the recorded operation.
    pub fn write_file(
        &mut self,
        relative_path: &str,
        content: &[u8],
    ) -> Result<Option<Operation>, TreeError> {
        self.ensure_started("write_file")?;
        let relative_path = path::as_file_path(relative_path);
        let full_path = self.full_path("write_file", &relative_path)?;
        let checksum = compute_checksum(content);

        let operation = match self.position(&relative_path) {
            Some(index) => {
                let current = match self.entries[index].checksum() {
                    Some(existing) => existing.to_string(),
                    None => compute_checksum(&self.fs.read(&full_path)?),
                };
                if current == checksum {
                    trace!(path = %relative_path, "Content unchanged, skipping write");
                    return Ok(None);
                }
                Operation::Change
            }
            None => Operation::Create,
        };

        self.fs.write(&full_path, content)?;
        let entry = Arc::new(Entry::new(
            relative_path,
            content.len() as u64,
            SystemTime::now(),
            Some(checksum),
        ));
        self.record(operation, entry);
        Ok(Some(operation))
    }

    /// Remove a file
    pub fn unlink(&mut self, relative_path: &str) -> Result<(), TreeError> {
        self.ensure_started("unlink")?;
        let relative_path = path::as_file_path(relative_path);
        let full_path = self.full_path("unlink", &relative_path)?;
        let index = self
            .position(&relative_path)
            .ok_or_else(|| TreeError::NotFound(relative_path.clone()))?;

        self.fs.remove_file(&full_path)?;
        let entry = self.entries.remove(index);
        self.track(Operation::Unlink, entry);
        Ok(())
    }

    /// Create a directory; a no-op when it already exists
    pub fn mkdir(&mut self, relative_path: &str) -> Result<(), TreeError> {
        self.ensure_started("mkdir")?;
        let relative_path = path::as_directory_path(relative_path);
        let full_path = self.full_path("mkdir", &relative_path)?;
        if self.position(&relative_path).is_some() {
            trace!(path = %relative_path, "Directory exists, skipping mkdir");
            return Ok(());
        }

        self.fs.create_dir(&full_path)?;
        let entry = Arc::new(Entry::new(relative_path, 0, SystemTime::now(), None));
        self.record(Operation::Mkdir, entry);
        Ok(())
    }

    /// Remove an empty directory
    pub fn rmdir(&mut self, relative_path: &str) -> Result<(), TreeError> {
        self.ensure_started("rmdir")?;
        let relative_path = path::as_directory_path(relative_path);
        let full_path = self.full_path("rmdir", &relative_path)?;
        let index = self
            .position(&relative_path)
            .ok_or_else(|| TreeError::NotFound(relative_path.clone()))?;

        self.fs.remove_dir(&full_path)?;
        let entry = self.entries.remove(index);
        self.track(Operation::Rmdir, entry);
        Ok(())
    }

    /// Merge more entries into the snapshot without touching the filesystem
    ///
    /// Entries replace any existing entry at the same path. With
    /// `sort_and_expand`, missing parents are added but existing directories
    /// are kept as they are.
    pub fn add_entries(
        &mut self,
        entries: Vec<Entry>,
        sort_and_expand: bool,
    ) -> Result<(), TreeError> {
        self.ensure_started("add_entries")?;
        let entries = if sort_and_expand {
            let supplied: HashSet<String> = entries
                .iter()
                .map(|e| e.relative_path().to_string())
                .collect();
            sort::sort_and_expand(entries)?
                .into_iter()
                .filter(|e| {
                    let path = e.relative_path();
                    supplied.contains(path) || self.position(path).is_none()
                })
                .collect()
        } else {
            sort::validate_sorted_unique(&entries)?;
            entries
        };

        debug!(entry_count = entries.len(), "Adding entries");
        for entry in entries {
            self.insert(Arc::new(entry));
        }
        Ok(())
    }

    /// [`add_entries`](Self::add_entries) for bare paths
    pub fn add_paths<I, P>(&mut self, paths: I, sort_and_expand: bool) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let entries = paths
            .into_iter()
            .map(|p| Entry::from_path(path::normalize_relative_path(p.as_ref())))
            .collect();
        self.add_entries(entries, sort_and_expand)
    }

    /// Patch turning this tree into `other`, using [`patch::default_is_equal`]
    pub fn calculate_patch<T: FileSystem>(&self, other: &FsTree<T>) -> Patch {
        patch::calculate_patch(&self.entries, &other.entries, patch::default_is_equal)
    }

    /// Patch turning this tree into `other` with a custom equality predicate
    pub fn calculate_patch_with<T, F>(&self, other: &FsTree<T>, is_equal: F) -> Patch
    where
        T: FileSystem,
        F: Fn(&Entry, &Entry) -> bool,
    {
        patch::calculate_patch(&self.entries, &other.entries, is_equal)
    }

    /// Calculate the patch to `other` and apply it from `input_root` onto `output_root`
    pub fn calculate_and_apply_patch<T: FileSystem>(
        &self,
        other: &FsTree<T>,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<Patch, TreeError> {
        let patch = self.calculate_patch(other);
        patch::apply_patch(input_root, output_root, &patch, &self.fs)?;
        Ok(patch)
    }

    fn ensure_started(&self, operation: &'static str) -> Result<(), TreeError> {
        match self.state {
            LifecycleState::Started => Ok(()),
            LifecycleState::Stopped => Err(TreeError::Stopped { operation }),
        }
    }

    fn full_path(
        &self,
        operation: &'static str,
        relative_path: &str,
    ) -> Result<PathBuf, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NoRoot { operation })?;
        Ok(root.join(path::strip_trailing_slash(relative_path)))
    }

    fn position(&self, relative_path: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.relative_path().cmp(relative_path))
            .ok()
    }

    fn insert(&mut self, entry: Arc<Entry>) {
        match self
            .entries
            .binary_search_by(|e| e.relative_path().cmp(entry.relative_path()))
        {
            Ok(index) => self.entries[index] = entry,
            Err(index) => self.entries.insert(index, entry),
        }
    }

    fn record(&mut self, operation: Operation, entry: Arc<Entry>) {
        self.track(operation, Arc::clone(&entry));
        self.insert(entry);
    }

    fn track(&mut self, operation: Operation, entry: Arc<Entry>) {
        debug!(operation = %operation, path = %entry.relative_path(), "Tracking change");
        self.changes.track(operation, entry);
    }
}

impl<S: FileSystem> std::fmt::Debug for FsTree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsTree")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("entries", &self.entries.len())
            .field("changes", &self.changes.records.len())
            .finish()
    }
}
