use async_trait::async_trait;

use crate::application::dtos::empty_dto::{EmptyTrashReport, EmptyTrashRequest};
use crate::common::errors::Result;

/// Port for trash emptying use cases
#[async_trait]
pub trait EmptyTrashUseCase: Send + Sync {
    /// Empty every resolved trash directory.
    ///
    /// Per-item failures are collected in the report; only an invalid request
    /// fails the call, and it does so before anything is removed.
    async fn empty_trash(&self, request: EmptyTrashRequest) -> Result<EmptyTrashReport>;
}
