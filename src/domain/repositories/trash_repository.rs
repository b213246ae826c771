use async_trait::async_trait;
use std::path::Path;

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::entities::trash_entry::{ContentEntry, MetadataRecord};

/// Point-in-time listing of one trash directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrashSnapshot {
    /// `info/<id>.trashinfo` entries
    pub records: Vec<MetadataRecord>,
    /// `files/<id>` entries
    pub contents: Vec<ContentEntry>,
    /// Entries in `info/` that are not trashinfo records; never touched
    pub foreign_entries: usize,
}

impl TrashSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.contents.is_empty()
    }
}

/// Result of one removal attempt
#[derive(Debug)]
pub enum RemovalOutcome {
    Removed,
    /// Target was already gone; counts as success
    AlreadyAbsent,
    Failed(DomainError),
}

/// Storage access for trash directories
#[async_trait]
pub trait TrashRepository: Send + Sync {
    /// Whether `root` exists and is a directory. Symbolic links do not count.
    async fn is_trash_directory(&self, root: &Path) -> bool;

    /// Whether `path` is a real directory with the sticky bit set.
    async fn is_sticky_directory(&self, path: &Path) -> bool;

    /// Lists `info/` and `files/`. Missing subdirectories list as empty.
    async fn snapshot(&self, directory: &TrashDirectory) -> Result<TrashSnapshot>;

    /// Raw bytes of a metadata record.
    async fn read_record(&self, record: &MetadataRecord) -> Result<Vec<u8>>;

    /// Removes a file, symlink or directory tree.
    async fn remove_entry(&self, path: &Path) -> RemovalOutcome;
}
