use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::application::dtos::empty_dto::{
    DirectoryReportDto, EmptyTrashReport, EmptyTrashRequest, KeptRecordDto, RemovalFailureDto,
};
use crate::application::ports::system_ports::{Clock, SystemInfoPort};
use crate::application::ports::trash_ports::EmptyTrashUseCase;
use crate::application::services::removal_service::{RemovalMode, RemovalReport, RemovalService};
use crate::application::services::selection_service::SelectionService;
use crate::application::services::trash_directory_resolver::TrashDirectoryResolver;
use crate::common::config::TrashConfig;
use crate::common::errors::Result;
use crate::domain::entities::selection::{KeepReason, KeptRecord, Selection};
use crate::domain::entities::trash_directory::TrashDirectory;
use crate::domain::entities::trash_info::format_deletion_date;
use crate::domain::repositories::trash_repository::TrashRepository;
use crate::domain::services::expiry_policy::ExpiryPolicy;

/// Empties every trash directory the current user owns
pub struct EmptyTrashService {
    resolver: TrashDirectoryResolver,
    selection_service: SelectionService,
    removal_service: RemovalService,
    clock: Arc<dyn Clock>,
}

impl EmptyTrashService {
    pub fn new(
        resolver: TrashDirectoryResolver,
        selection_service: SelectionService,
        removal_service: RemovalService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            selection_service,
            removal_service,
            clock,
        }
    }

    /// Wires the service over one repository.
    pub fn from_config(
        repository: Arc<dyn TrashRepository>,
        system_info: Arc<dyn SystemInfoPort>,
        clock: Arc<dyn Clock>,
        config: &TrashConfig,
    ) -> Self {
        Self::new(
            TrashDirectoryResolver::new(repository.clone(), system_info, config),
            SelectionService::new(repository.clone()),
            RemovalService::new(repository),
            clock,
        )
    }

    async fn empty_directory(
        &self,
        directory: &TrashDirectory,
        policy: &ExpiryPolicy,
        now: NaiveDateTime,
        mode: RemovalMode,
    ) -> DirectoryReportDto {
        match self.selection_service.select(directory, policy, now).await {
            Ok(selection) if selection.is_empty() => {
                Self::to_dto(selection, RemovalReport::default())
            }
            Ok(selection) => {
                let removal = self.removal_service.remove(&selection, mode).await;
                Self::to_dto(selection, removal)
            }
            Err(e) => {
                warn!(trash_dir = %directory, error = %e, "Cannot scan trash directory, treating it as empty");
                let mut report = Self::to_dto(Selection::empty(directory.clone()), RemovalReport::default());
                report.scan_error = Some(e.to_string());
                report
            }
        }
    }

    fn to_dto(selection: Selection, removal: RemovalReport) -> DirectoryReportDto {
        DirectoryReportDto {
            root: selection.directory.root().to_path_buf(),
            kind: selection.directory.kind().label().to_string(),
            removed: removal.removed,
            already_absent: removal.already_absent,
            skipped: removal.skipped,
            kept: selection.kept.into_iter().map(Self::kept_to_dto).collect(),
            foreign_entries: selection.foreign_entries,
            failures: removal
                .failures
                .into_iter()
                .map(|failure| RemovalFailureDto {
                    path: failure.path,
                    target: failure.target,
                    kind: failure.cause.kind.to_string(),
                    message: failure.cause.to_string(),
                })
                .collect(),
            scan_error: None,
        }
    }

    fn kept_to_dto(kept: KeptRecord) -> KeptRecordDto {
        let (reason, deletion_date, original_path) = match kept.reason {
            KeepReason::NotExpired {
                deletion_date,
                original_path,
            } => (
                "not expired".to_string(),
                Some(format_deletion_date(&deletion_date)),
                original_path,
            ),
            KeepReason::Undecodable(e) => (e.to_string(), None, None),
        };
        KeptRecordDto {
            path: kept.record.path,
            reason,
            deletion_date,
            original_path,
        }
    }
}

#[async_trait]
impl EmptyTrashUseCase for EmptyTrashService {
    #[instrument(skip(self))]
    async fn empty_trash(&self, request: EmptyTrashRequest) -> Result<EmptyTrashReport> {
        let policy = ExpiryPolicy::from_retention_days(request.retention_days)?;
        let mode = if request.dry_run {
            RemovalMode::DryRun
        } else {
            RemovalMode::Delete
        };
        // one reading for the whole run
        let now = self.clock.now();

        info!(
            now = %format_deletion_date(&now),
            retention_days = ?policy.retention_days(),
            dry_run = request.dry_run,
            "Emptying trash"
        );

        let directories = self.resolver.resolve().await;
        let mut reports = Vec::with_capacity(directories.len());
        for directory in &directories {
            reports.push(self.empty_directory(directory, &policy, now, mode).await);
        }

        let report = EmptyTrashReport {
            now,
            retention_days: policy.retention_days(),
            dry_run: request.dry_run,
            directories: reports,
        };

        info!(
            directories = report.directories.len(),
            removed = report.removed_count(),
            kept = report.kept_count(),
            failures = report.failures().count(),
            "Trash emptied"
        );

        Ok(report)
    }
}
