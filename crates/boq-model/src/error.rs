use thiserror::Error;

/// Fatal pipeline errors.
///
/// Only unrecoverable setup failures surface through this type. Row-level
/// problems are recovered locally and reported through statistics and
/// per-position validation results instead.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The catalog could not be built; the run aborts before any position
    /// is processed.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
