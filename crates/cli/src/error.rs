//! CLI error types with exit code mapping.

use library_store::StoreError;
use ratings::RatingError;
use thiserror::Error;

/// Exit code for failures of the environment (database, I/O).
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for requests rejected because of their input.
pub const EXIT_REJECTED: u8 = 2;

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Could not open the connection pool. Fatal at startup.
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    /// Store error outside the rating services (migrations, listings).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rating request was rejected or failed.
    #[error(transparent)]
    Rating(#[from] RatingError),

    /// The prompted book id was not a non-negative integer.
    #[error("Invalid book id {0:?}: enter a numeric book id")]
    InvalidBookId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Rating(RatingError::StorageFailure(_)) => EXIT_FAILURE,
            CliError::Rating(_) | CliError::InvalidBookId(_) => EXIT_REJECTED,
            CliError::Connection(_) | CliError::Store(_) | CliError::Io(_) | CliError::Json(_) => {
                EXIT_FAILURE
            }
        }
    }
}
