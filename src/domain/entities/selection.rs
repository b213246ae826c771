use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::entities::trash_entry::{ContentEntry, MetadataRecord};
use crate::domain::entities::trash_info::TrashInfoError;

/// A record selected for removal together with its content, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    pub record: MetadataRecord,
    pub content: Option<ContentEntry>,
}

/// Why a record survives the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// Deleted at `deletion_date`, which is not older than the cutoff
    NotExpired {
        deletion_date: NaiveDateTime,
        original_path: Option<PathBuf>,
    },
    /// No usable deletion date; kept to be safe
    Undecodable(TrashInfoError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptRecord {
    pub record: MetadataRecord,
    pub reason: KeepReason,
}

/// What one trash directory loses in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub directory: TrashDirectory,
    pub items: Vec<SelectedItem>,
    pub orphans: Vec<ContentEntry>,
    pub kept: Vec<KeptRecord>,
    /// `info/` entries that are not trashinfo records; never touched
    pub foreign_entries: usize,
}

impl Selection {
    pub fn empty(directory: TrashDirectory) -> Self {
        Self {
            directory,
            items: Vec::new(),
            orphans: Vec::new(),
            kept: Vec::new(),
            foreign_entries: 0,
        }
    }

    /// True when nothing is to be removed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.orphans.is_empty()
    }
}
