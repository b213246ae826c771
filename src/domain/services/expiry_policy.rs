use chrono::{Duration, NaiveDateTime};

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::selection::KeepReason;
use crate::domain::entities::trash_info::{TrashInfo, TrashInfoError};

/// Minimum age, in days, before a trashed item may be purged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow {
    days: u32,
}

impl RetentionWindow {
    /// Validates a user supplied day count. Negative values are rejected.
    pub fn from_days(days: i64) -> Result<Self> {
        if days < 0 {
            return Err(DomainError::validation_error(
                "RetentionWindow",
                format!("retention window must be a non-negative number of days, got {}", days),
            ));
        }
        let days = u32::try_from(days).map_err(|_| {
            DomainError::validation_error(
                "RetentionWindow",
                format!("retention window of {} days is too large", days),
            )
        })?;
        Ok(Self { days })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// `now - days`. `None` if that falls before the earliest representable
    /// date, in which case nothing is old enough.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        now.checked_sub_signed(Duration::days(i64::from(self.days)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Keep(KeepReason),
}

/// Decides which metadata records an empty run may remove.
///
/// Orphaned content carries no deletion date and is always eligible; only
/// records go through this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Every record goes
    Unconditional,
    /// Records strictly older than the window go
    OlderThan(RetentionWindow),
}

impl ExpiryPolicy {
    pub fn from_retention_days(days: Option<i64>) -> Result<Self> {
        match days {
            None => Ok(ExpiryPolicy::Unconditional),
            Some(days) => RetentionWindow::from_days(days).map(ExpiryPolicy::OlderThan),
        }
    }

    pub fn retention_days(&self) -> Option<u32> {
        match self {
            ExpiryPolicy::Unconditional => None,
            ExpiryPolicy::OlderThan(window) => Some(window.days()),
        }
    }

    /// Whether records have to be read at all.
    pub fn needs_deletion_dates(&self) -> bool {
        matches!(self, ExpiryPolicy::OlderThan(_))
    }

    pub fn evaluate(
        &self,
        now: NaiveDateTime,
        decoded: &std::result::Result<TrashInfo, TrashInfoError>,
    ) -> Eligibility {
        let window = match self {
            ExpiryPolicy::Unconditional => return Eligibility::Eligible,
            ExpiryPolicy::OlderThan(window) => window,
        };

        let info = match decoded {
            Ok(info) => info,
            Err(e) => return Eligibility::Keep(KeepReason::Undecodable(e.clone())),
        };

        match window.cutoff(now) {
            Some(cutoff) if info.deletion_date < cutoff => Eligibility::Eligible,
            _ => Eligibility::Keep(KeepReason::NotExpired {
                deletion_date: info.deletion_date,
                original_path: info.original_path.clone(),
            }),
        }
    }
}
