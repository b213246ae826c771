pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::services::empty_trash_service::EmptyTrashService;
pub use application::EmptyTrashUseCase;
pub use common::config::AppConfig;
pub use common::errors::{DomainError, ErrorKind, Result};
pub use infrastructure::repositories::TrashFsRepository;
pub use infrastructure::services::{SystemClock, SystemInfoService};
