use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error categories shared across the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity not found
    NotFound,
    /// Entity already exists (or two entries claim the same id)
    AlreadyExists,
    /// Invalid input or failed validation
    InvalidInput,
    /// Permission problem
    AccessDenied,
    /// Operation timed out
    Timeout,
    /// Internal or I/O failure
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::NotFound => write!(f, "Not Found"),
            ErrorKind::AlreadyExists => write!(f, "Already Exists"),
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::AccessDenied => write!(f, "Access Denied"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::InternalError => write!(f, "Internal Error"),
        }
    }
}

impl From<io::ErrorKind> for ErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
            io::ErrorKind::PermissionDenied => ErrorKind::AccessDenied,
            io::ErrorKind::TimedOut => ErrorKind::Timeout,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => ErrorKind::InvalidInput,
            _ => ErrorKind::InternalError,
        }
    }
}

/// Domain error carrying the affected entity and an optional source
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct DomainError {
    /// Error category
    pub kind: ErrorKind,
    /// Entity type involved (e.g. "TrashDirectory", "TrashInfo")
    pub entity_type: &'static str,
    /// Entity identifier, usually a path, when known
    pub entity_id: Option<String>,
    /// Human readable message
    pub message: String,
    /// Underlying error
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

pub type Result<T> = std::result::Result<T, DomainError>;

impl DomainError {
    pub fn new<S: Into<String>>(kind: ErrorKind, entity_type: &'static str, message: S) -> Self {
        Self {
            kind,
            entity_type,
            entity_id: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn already_exists<S: Into<String>>(entity_type: &'static str, entity_id: S) -> Self {
        let id = entity_id.into();
        Self {
            kind: ErrorKind::AlreadyExists,
            entity_type,
            entity_id: Some(id.clone()),
            message: format!("{} already exists: {}", entity_type, id),
            source: None,
        }
    }

    pub fn internal_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InternalError, entity_type, message)
    }

    pub fn validation_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, entity_type, message)
    }

    /// Wraps an I/O failure on `path`, keeping the io kind as the error kind.
    pub fn io(entity_type: &'static str, action: &str, path: &Path, err: io::Error) -> Self {
        Self::new(
            err.kind().into(),
            entity_type,
            format!("Failed to {} {}: {}", action, path.display(), err),
        )
        .with_id(path.display().to_string())
        .with_source(err)
    }

    pub fn with_id<S: Into<String>>(mut self, entity_id: S) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Adds context to foreign errors while converting them into `DomainError`
pub trait ErrorContext<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: StdError + Send + Sync + 'static> ErrorContext<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| DomainError {
            kind: ErrorKind::InternalError,
            entity_type: "Unknown",
            entity_id: None,
            message: context().into(),
            source: Some(Box::new(e)),
        })
    }
}

/// Implements `From<$error_type> for DomainError` as an internal error
#[macro_export]
macro_rules! impl_from_error {
    ($error_type:ty, $entity_type:expr) => {
        impl From<$error_type> for DomainError {
            fn from(err: $error_type) -> Self {
                DomainError {
                    kind: ErrorKind::InternalError,
                    entity_type: $entity_type,
                    entity_id: None,
                    message: format!("{}", err),
                    source: Some(Box::new(err)),
                }
            }
        }
    };
}

impl_from_error!(std::io::Error, "IO");
impl_from_error!(serde_json::Error, "Serialization");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_kind_and_path() {
        let err = DomainError::io(
            "TrashEntry",
            "remove",
            Path::new("/tmp/trash/files/foo"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(err.entity_id.as_deref(), Some("/tmp/trash/files/foo"));
        assert!(err.message.contains("remove /tmp/trash/files/foo"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_with_context_replaces_message() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::other("disk on fire"));
        let err = result.with_context(|| "Failed to read mount table").unwrap_err();

        assert_eq!(err.kind, ErrorKind::InternalError);
        assert_eq!(err.to_string(), "Internal Error: Failed to read mount table");
        assert!(err.source.is_some());
    }
}
