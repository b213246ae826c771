use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

/// Request to empty every resolved trash directory
#[derive(Debug, Clone, Default)]
pub struct EmptyTrashRequest {
    /// Keep items trashed within this many days. `None` empties everything.
    /// Negative values are rejected before anything is removed.
    pub retention_days: Option<i64>,
    /// Report what would be removed without touching the disk
    pub dry_run: bool,
}

/// Which half of a trashed item a removal targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalTarget {
    /// `info/<id>.trashinfo`
    Metadata,
    /// `files/<id>` paired with a record
    Content,
    /// `files/<id>` without a record
    Orphan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailureDto {
    pub path: PathBuf,
    pub target: RemovalTarget,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeptRecordDto {
    pub path: PathBuf,
    pub reason: String,
    pub deletion_date: Option<String>,
    /// Where the item lived before it was trashed
    pub original_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryReportDto {
    pub root: PathBuf,
    pub kind: String,
    /// Paths removed, or that would be removed in a dry run
    pub removed: Vec<PathBuf>,
    /// Selected paths that were already gone
    pub already_absent: Vec<PathBuf>,
    /// Content left in place because its record could not be removed
    pub skipped: Vec<PathBuf>,
    pub kept: Vec<KeptRecordDto>,
    pub foreign_entries: usize,
    pub failures: Vec<RemovalFailureDto>,
    /// Set when the directory could not be listed and was treated as empty
    pub scan_error: Option<String>,
}

/// Outcome of one empty run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyTrashReport {
    pub now: NaiveDateTime,
    pub retention_days: Option<u32>,
    pub dry_run: bool,
    pub directories: Vec<DirectoryReportDto>,
}

impl EmptyTrashReport {
    pub fn has_failures(&self) -> bool {
        self.directories.iter().any(|dir| !dir.failures.is_empty())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RemovalFailureDto> {
        self.directories.iter().flat_map(|dir| dir.failures.iter())
    }

    pub fn removed_count(&self) -> usize {
        self.directories.iter().map(|dir| dir.removed.len()).sum()
    }

    pub fn kept_count(&self) -> usize {
        self.directories.iter().map(|dir| dir.kept.len()).sum()
    }
}
