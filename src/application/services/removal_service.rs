use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use crate::application::dtos::empty_dto::RemovalTarget;
use crate::common::errors::DomainError;
use crate::domain::entities::selection::Selection;
use crate::domain::repositories::trash_repository::{RemovalOutcome, TrashRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    Delete,
    /// Report every selected path as removed without touching it
    DryRun,
}

#[derive(Debug)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub target: RemovalTarget,
    pub cause: DomainError,
}

/// What happened to one directory's selection
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: Vec<PathBuf>,
    pub already_absent: Vec<PathBuf>,
    /// Content whose record could not be removed
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<RemovalFailure>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deletes selected trash entries one by one.
///
/// A failed removal is recorded and the run moves on. For a paired item the
/// record goes first; when it cannot be removed the content stays, so no
/// record is left pointing at nothing it could restore.
pub struct RemovalService {
    repository: Arc<dyn TrashRepository>,
}

impl RemovalService {
    pub fn new(repository: Arc<dyn TrashRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, selection), fields(root = %selection.directory.root().display()))]
    pub async fn remove(&self, selection: &Selection, mode: RemovalMode) -> RemovalReport {
        let mut report = RemovalReport::default();

        if mode == RemovalMode::DryRun {
            for item in &selection.items {
                report.removed.push(item.record.path.clone());
                if let Some(content) = &item.content {
                    report.removed.push(content.path.clone());
                }
            }
            report
                .removed
                .extend(selection.orphans.iter().map(|orphan| orphan.path.clone()));
            debug!(count = report.removed.len(), "Dry run, nothing removed");
            return report;
        }

        for item in &selection.items {
            let record_gone = self
                .remove_one(&item.record.path, RemovalTarget::Metadata, &mut report)
                .await;

            match &item.content {
                Some(content) if record_gone => {
                    self.remove_one(&content.path, RemovalTarget::Content, &mut report)
                        .await;
                }
                Some(content) => {
                    warn!(path = %content.path.display(), "Leaving content in place, its record could not be removed");
                    report.skipped.push(content.path.clone());
                }
                None => {}
            }
        }

        for orphan in &selection.orphans {
            self.remove_one(&orphan.path, RemovalTarget::Orphan, &mut report)
                .await;
        }

        if !report.is_clean() {
            warn!(failures = report.failures.len(), "Some trash entries could not be removed");
        }
        report
    }

    /// Returns whether the path is gone afterwards.
    async fn remove_one(&self, path: &Path, target: RemovalTarget, report: &mut RemovalReport) -> bool {
        match self.repository.remove_entry(path).await {
            RemovalOutcome::Removed => {
                debug!(path = %path.display(), ?target, "Removed");
                report.removed.push(path.to_path_buf());
                true
            }
            RemovalOutcome::AlreadyAbsent => {
                debug!(path = %path.display(), ?target, "Already gone");
                report.already_absent.push(path.to_path_buf());
                true
            }
            RemovalOutcome::Failed(cause) => {
                error!(path = %path.display(), ?target, error = %cause, "Failed to remove trash entry");
                report.failures.push(RemovalFailure {
                    path: path.to_path_buf(),
                    target,
                    cause,
                });
                false
            }
        }
    }
}
