use std::fmt;

use tokio_postgres::error::SqlState;

/// Result type for blog store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for blog store operations
#[derive(Debug)]
pub enum Error {
    /// Unique constraint violation (duplicate slug, username, ...)
    ConflictError(String),

    /// Validation error - invalid input data
    ValidationError(String),

    /// Connection error - database unreachable or bad connection string
    ConnectionError(String),

    /// Not found error - row doesn't exist
    NotFoundError(String),

    /// Database error - SQL errors other than unique violations
    DatabaseError(String),

    /// Pool error - connection pool issues
    PoolError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConflictError(msg) => write!(f, "Conflict: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Error::NotFoundError(msg) => write!(f, "Not found: {}", msg),
            Error::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            Error::PoolError(msg) => write!(f, "Pool error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convert tokio-postgres errors, singling out unique violations
impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            if db_error.code() == &SqlState::UNIQUE_VIOLATION {
                let detail = db_error
                    .detail()
                    .map(str::to_string)
                    .or_else(|| db_error.constraint().map(|c| format!("constraint {}", c)))
                    .unwrap_or_else(|| db_error.message().to_string());
                return Error::ConflictError(detail);
            }

            return Error::DatabaseError(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }

        Error::DatabaseError(format!("{:?}", err))
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Error::PoolError(err.to_string())
    }
}

impl From<deadpool_postgres::BuildError> for Error {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        Error::ConnectionError(err.to_string())
    }
}
