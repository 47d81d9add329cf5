//! Treepatch: ordered filesystem patches between tree snapshots
//!
//! A tree snapshot is a sorted list of [`Entry`] values. Comparing two
//! snapshots with [`calculate_patch`] yields the minimal ordered list of
//! `create`, `change`, `unlink`, `mkdir` and `rmdir` operations that turns
//! the first into the second, without re-scanning or re-hashing anything.
//! [`FsTree`] holds one snapshot, mirrors mutations onto a directory and
//! records them as changes.

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod fs;
pub mod hasher;
pub mod logging;
pub mod patch;
pub mod path;
pub mod sort;
pub mod tree;

pub use entry::Entry;
pub use error::TreeError;
pub use filter::FilterOptions;
pub use fs::{FileSystem, LocalFileSystem};
pub use patch::{
    apply_patch, calculate_patch, checksum_is_equal, default_is_equal, Operation, Patch,
    PatchOperation,
};
pub use tree::{Change, FsTree, LifecycleState, TreeOptions};
