use common::{BookId, OutOfScale, ReaderId};
use thiserror::Error;

/// Errors that can occur when interacting with the library store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(reader, book)` pair already has a rating.
    /// Raised by the `unique_reader_book` constraint or its in-memory equivalent.
    #[error("Reader {reader_id} has already rated book {book_id}")]
    DuplicateRating { reader_id: ReaderId, book_id: BookId },

    /// A row references another row that does not exist.
    #[error("Missing {table} row with id {id}")]
    MissingReference { table: &'static str, id: i32 },

    /// A stored rating value fell outside the scale.
    #[error("Corrupt rating row: {0}")]
    CorruptRating(#[from] OutOfScale),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
