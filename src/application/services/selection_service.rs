use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::common::errors::Result;
use crate::domain::entities::selection::{KeepReason, KeptRecord, SelectedItem, Selection};
use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::entities::trash_entry::{ContentEntry, Correlation, MetadataRecord};
use crate::domain::entities::trash_info::{TrashInfo, TrashInfoError};
use crate::domain::repositories::trash_repository::TrashRepository;
use crate::domain::services::correlation_service::correlate;
use crate::domain::services::expiry_policy::{Eligibility, ExpiryPolicy};

/// Lists a trash directory and decides what an empty run removes from it
pub struct SelectionService {
    repository: Arc<dyn TrashRepository>,
}

impl SelectionService {
    pub fn new(repository: Arc<dyn TrashRepository>) -> Self {
        Self { repository }
    }

    /// Builds the selection for one directory.
    ///
    /// Orphaned content is always selected. Records are read only when the
    /// policy looks at deletion dates.
    #[instrument(skip(self, directory, policy), fields(root = %directory.root().display()))]
    pub async fn select(
        &self,
        directory: &TrashDirectory,
        policy: &ExpiryPolicy,
        now: NaiveDateTime,
    ) -> Result<Selection> {
        let snapshot = self.repository.snapshot(directory).await?;

        let mut selection = Selection::empty(directory.clone());
        selection.foreign_entries = snapshot.foreign_entries;
        if snapshot.is_empty() {
            debug!(foreign = snapshot.foreign_entries, "Trash directory holds no items");
            return Ok(selection);
        }

        for correlation in correlate(snapshot.records, snapshot.contents)? {
            match correlation {
                Correlation::Matched { record, content } => {
                    self.classify(&mut selection, record, Some(content), policy, now)
                        .await
                }
                Correlation::DanglingMetadata { record } => {
                    self.classify(&mut selection, record, None, policy, now).await
                }
                Correlation::OrphanContent { content } => {
                    debug!(path = %content.path.display(), "Orphaned content selected");
                    selection.orphans.push(content);
                }
            }
        }

        debug!(
            items = selection.items.len(),
            orphans = selection.orphans.len(),
            kept = selection.kept.len(),
            "Selection built"
        );

        Ok(selection)
    }

    async fn classify(
        &self,
        selection: &mut Selection,
        record: MetadataRecord,
        content: Option<ContentEntry>,
        policy: &ExpiryPolicy,
        now: NaiveDateTime,
    ) {
        let eligibility = if policy.needs_deletion_dates() {
            let decoded = self.decode(&record).await;
            policy.evaluate(now, &decoded)
        } else {
            Eligibility::Eligible
        };

        match eligibility {
            Eligibility::Eligible => selection.items.push(SelectedItem { record, content }),
            Eligibility::Keep(reason) => {
                if let KeepReason::Undecodable(e) = &reason {
                    warn!(path = %record.path.display(), error = %e, "Keeping trash item without a usable deletion date");
                }
                selection.kept.push(KeptRecord { record, reason });
            }
        }
    }

    async fn decode(&self, record: &MetadataRecord) -> std::result::Result<TrashInfo, TrashInfoError> {
        match self.repository.read_record(record).await {
            Ok(bytes) => TrashInfo::parse_bytes(&bytes),
            Err(e) => Err(TrashInfoError::Unreadable(e.to_string())),
        }
    }
}
