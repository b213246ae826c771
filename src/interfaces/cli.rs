use clap::Parser;
use std::io::Write;
use tracing::{debug, error, instrument};

use crate::application::dtos::empty_dto::{EmptyTrashReport, EmptyTrashRequest, RemovalTarget};
use crate::application::ports::trash_ports::EmptyTrashUseCase;
use crate::common::config::{AppConfig, VERBOSE_LOG_FILTER};
use crate::common::errors::{ErrorKind, Result};

/// Every selected item was removed or already gone
pub const EXIT_SUCCESS: u8 = 0;
/// At least one removal failed
pub const EXIT_FAILURE: u8 = 1;
/// Bad arguments; nothing was removed
pub const EXIT_USAGE: u8 = 2;

const PROGRAM_NAME: &str = "trash-empty";

/// Permanently delete trashed files
#[derive(Debug, Clone, Parser)]
#[command(name = "trash-empty", version)]
pub struct Cli {
    /// Only delete items trashed more than DAYS days ago
    #[arg(value_name = "DAYS", allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// List every path removed or kept and log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip trash directories on mounted volumes
    #[arg(long)]
    pub home_only: bool,
}

impl Cli {
    pub fn request(&self) -> EmptyTrashRequest {
        EmptyTrashRequest {
            retention_days: self.days,
            dry_run: self.dry_run,
        }
    }

    /// Folds command line switches into the environment configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.home_only {
            config.trash.scan_volumes = false;
        }
        if self.verbose {
            config.logging.filter = VERBOSE_LOG_FILTER.to_string();
        }
    }
}

/// Runs one empty and renders its outcome, returning the process exit code.
#[instrument(skip_all)]
pub async fn empty_trash(
    use_case: &dyn EmptyTrashUseCase,
    cli: &Cli,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    match use_case.empty_trash(cli.request()).await {
        Ok(report) => {
            debug!(removed = report.removed_count(), "Empty finished");
            if let Err(e) = render_report(&report, cli, out, err) {
                error!(error = %e, "Cannot write report");
                return EXIT_FAILURE;
            }
            exit_code_for(&report)
        }
        Err(e) => {
            error!(error = %e, "Empty aborted");
            // best effort, the exit code already carries the outcome
            let _ = writeln!(err, "{}: {}", PROGRAM_NAME, e.message);
            match e.kind {
                ErrorKind::InvalidInput => EXIT_USAGE,
                _ => EXIT_FAILURE,
            }
        }
    }
}

pub fn exit_code_for(report: &EmptyTrashReport) -> u8 {
    if report.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Writes the report to `out`; failures and scan errors always go to `err`.
pub fn render_report(
    report: &EmptyTrashReport,
    cli: &Cli,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    for directory in &report.directories {
        if let Some(scan_error) = &directory.scan_error {
            writeln!(
                err,
                "{}: cannot scan {}: {}",
                PROGRAM_NAME,
                directory.root.display(),
                scan_error
            )?;
        }
    }
    for failure in report.failures() {
        writeln!(
            err,
            "{}: cannot remove {} ({}): {}",
            PROGRAM_NAME,
            failure.path.display(),
            target_label(failure.target),
            failure.message
        )?;
    }

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    let removed_verb = if report.dry_run { "would remove" } else { "removed" };
    for directory in &report.directories {
        if report.dry_run || cli.verbose {
            for path in &directory.removed {
                writeln!(out, "{} {}", removed_verb, path.display())?;
            }
        }
        if cli.verbose {
            for path in &directory.skipped {
                writeln!(out, "skipped {}", path.display())?;
            }
            for kept in &directory.kept {
                let mut detail = kept.reason.clone();
                if let Some(date) = &kept.deletion_date {
                    detail.push_str(&format!(", deleted {}", date));
                }
                if let Some(original) = &kept.original_path {
                    detail.push_str(&format!(", from {}", original.display()));
                }
                writeln!(out, "kept {} ({})", kept.path.display(), detail)?;
            }
        }
    }

    Ok(())
}

fn target_label(target: RemovalTarget) -> &'static str {
    match target {
        RemovalTarget::Metadata => "trashinfo",
        RemovalTarget::Content => "content",
        RemovalTarget::Orphan => "orphan",
    }
}
