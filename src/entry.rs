//! Tree entries
//!
//! An [`Entry`] is the immutable metadata record for one path in a tree
//! snapshot. Directory status lives in the mode bits and is derived from the
//! trailing `/` of the relative path when the entry is constructed.

use crate::path;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// File-type mask of a mode value (`S_IFMT`)
pub const TYPE_MASK: u32 = 0o170000;

/// Mode bits identifying a directory (`S_IFDIR`)
pub const DIRECTORY_MODE: u32 = 0o040000;

/// Mode given to file entries built without filesystem metadata (`S_IFREG`)
pub const FILE_MODE: u32 = 0o100000;

/// Metadata for one file or directory in a tree snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    relative_path: String,
    mode: u32,
    size: u64,
    #[serde(with = "mtime_millis")]
    mtime: SystemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
}

impl Entry {
    /// Create an entry; a trailing `/` on `relative_path` makes it a directory
    pub fn new(
        relative_path: impl Into<String>,
        size: u64,
        mtime: SystemTime,
        checksum: Option<String>,
    ) -> Self {
        let relative_path = relative_path.into();
        let mode = if path::is_directory_path(&relative_path) {
            DIRECTORY_MODE
        } else {
            FILE_MODE
        };
        Self {
            relative_path,
            mode,
            size,
            mtime,
            checksum,
        }
    }

    /// Create an entry with an explicit mode
    ///
    /// The caller is responsible for keeping the mode consistent with the
    /// trailing-slash convention of `relative_path`.
    pub fn with_mode(
        relative_path: impl Into<String>,
        mode: u32,
        size: u64,
        mtime: SystemTime,
        checksum: Option<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            mode,
            size,
            mtime,
            checksum,
        }
    }

    /// Entry for a bare path: zero size, epoch mtime, no checksum
    pub fn from_path(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path, 0, UNIX_EPOCH, None)
    }

    /// Build an entry from filesystem metadata
    ///
    /// Directories get a trailing `/` appended to `relative_path` so the
    /// path convention and the mode bits agree. Fails when the platform
    /// cannot report a modification time.
    pub fn from_metadata(
        relative_path: &str,
        metadata: &std::fs::Metadata,
    ) -> std::io::Result<Self> {
        let is_dir = metadata.is_dir();
        let relative_path = if is_dir {
            path::as_directory_path(relative_path)
        } else {
            path::normalize_relative_path(relative_path)
        };
        let size = if is_dir { 0 } else { metadata.len() };
        let mtime = metadata.modified()?;
        Ok(Self::with_mode(relative_path, metadata_mode(metadata), size, mtime, None))
    }

    /// Relative path, with a trailing `/` for directories
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }

    /// Modification time as milliseconds since the Unix epoch
    pub fn mtime_ms(&self) -> u128 {
        self.mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn is_directory(&self) -> bool {
        self.mode & TYPE_MASK == DIRECTORY_MODE
    }

    pub fn is_file(&self) -> bool {
        !self.is_directory()
    }
}

#[cfg(unix)]
fn metadata_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn metadata_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.is_dir() {
        DIRECTORY_MODE
    } else {
        FILE_MODE
    }
}

/// Serialize `SystemTime` as integer milliseconds since the Unix epoch
mod mtime_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mtime: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}
