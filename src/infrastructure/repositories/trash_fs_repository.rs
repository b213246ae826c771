use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::entities::trash_entry::{ContentEntry, MetadataRecord};
use crate::domain::repositories::trash_repository::{RemovalOutcome, TrashRepository, TrashSnapshot};

#[cfg(unix)]
const STICKY_BIT: u32 = 0o1000;

/// Trash repository backed by the local filesystem
#[derive(Debug, Default, Clone)]
pub struct TrashFsRepository;

impl TrashFsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Lists a directory sorted by name. A missing directory lists as empty.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<(OsString, PathBuf)>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Directory missing, nothing to list");
                return Ok(Vec::new());
            }
            Err(e) => return Err(DomainError::io("TrashDirectory", "list", dir, e)),
        };

        let mut listed = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::io("TrashDirectory", "list", dir, e))?
        {
            listed.push((entry.file_name(), entry.path()));
        }
        listed.sort();

        Ok(listed)
    }
}

#[async_trait]
impl TrashRepository for TrashFsRepository {
    async fn is_trash_directory(&self, root: &Path) -> bool {
        match fs::symlink_metadata(root).await {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                warn!(root = %root.display(), "Trash directory is a symbolic link, skipping it");
                false
            }
            Ok(metadata) => metadata.is_dir(),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(root = %root.display(), error = %e, "Cannot stat trash directory");
                }
                false
            }
        }
    }

    async fn is_sticky_directory(&self, path: &Path) -> bool {
        let metadata = match fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cannot stat directory");
                return false;
            }
        };
        if !metadata.is_dir() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & STICKY_BIT != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }

    #[instrument(skip(self, directory), fields(root = %directory.root().display()))]
    async fn snapshot(&self, directory: &TrashDirectory) -> Result<TrashSnapshot> {
        let mut snapshot = TrashSnapshot::default();

        for (name, path) in self.list_dir(&directory.info_dir()).await? {
            match MetadataRecord::from_info_entry(&name, path) {
                Some(record) => snapshot.records.push(record),
                None => {
                    debug!(name = %name.to_string_lossy(), "Ignoring foreign entry in info directory");
                    snapshot.foreign_entries += 1;
                }
            }
        }

        for (name, path) in self.list_dir(&directory.files_dir()).await? {
            snapshot.contents.push(ContentEntry::new(name, path));
        }

        debug!(
            records = snapshot.records.len(),
            contents = snapshot.contents.len(),
            foreign = snapshot.foreign_entries,
            "Trash directory listed"
        );

        Ok(snapshot)
    }

    async fn read_record(&self, record: &MetadataRecord) -> Result<Vec<u8>> {
        fs::read(&record.path)
            .await
            .map_err(|e| DomainError::io("TrashInfo", "read", &record.path, e))
    }

    async fn remove_entry(&self, path: &Path) -> RemovalOutcome {
        // symlink_metadata so a link to a directory is unlinked, never followed
        let metadata = match fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return RemovalOutcome::AlreadyAbsent,
            Err(e) => return RemovalOutcome::Failed(DomainError::io("TrashEntry", "stat", path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };

        match result {
            Ok(()) => RemovalOutcome::Removed,
            Err(e) if e.kind() == io::ErrorKind::NotFound => RemovalOutcome::AlreadyAbsent,
            Err(e) => RemovalOutcome::Failed(DomainError::io("TrashEntry", "remove", path, e)),
        }
    }
}
