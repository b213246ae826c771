use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::common::errors::Result;

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Identity of the invoking user and the volumes mounted for them
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
#[async_trait]
pub trait SystemInfoPort: Send + Sync {
    /// Numeric owner id used in volume trash paths
    fn current_owner_id(&self) -> u32;

    /// Mount points of currently mounted volumes, in mount-table order
    async fn list_mounted_volumes(&self) -> Result<Vec<PathBuf>>;
}
