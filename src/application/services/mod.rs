pub mod empty_trash_service;
pub mod removal_service;
pub mod selection_service;
pub mod trash_directory_resolver;

pub use empty_trash_service::EmptyTrashService;
pub use removal_service::{RemovalMode, RemovalReport, RemovalService};
pub use selection_service::SelectionService;
pub use trash_directory_resolver::TrashDirectoryResolver;
