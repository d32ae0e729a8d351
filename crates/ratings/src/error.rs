//! Rating error types.

use common::{BookId, ReaderId};
use library_store::StoreError;
use thiserror::Error;

/// Errors that can occur while recording or reporting ratings.
#[derive(Debug, Error)]
pub enum RatingError {
    /// No reader with this id exists.
    #[error("Reader with id {0} not found")]
    ReaderNotFound(ReaderId),

    /// No book with this id exists.
    #[error("Book with id {0} not found")]
    BookNotFound(BookId),

    /// The reader has already rated this book.
    #[error("Reader {reader_id} has already rated book {book_id}")]
    DuplicateRating { reader_id: ReaderId, book_id: BookId },

    /// The value is not on the rating scale.
    #[error("Invalid rating value {0}: allowed values are 1-5")]
    InvalidRatingValue(i64),

    /// The store failed; any write in progress was rolled back.
    #[error("Storage failure: {0}")]
    StorageFailure(StoreError),
}

impl RatingError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            RatingError::ReaderNotFound(_) => "reader_not_found",
            RatingError::BookNotFound(_) => "book_not_found",
            RatingError::DuplicateRating { .. } => "duplicate_rating",
            RatingError::InvalidRatingValue(_) => "invalid_rating_value",
            RatingError::StorageFailure(_) => "storage_failure",
        }
    }
}

impl From<StoreError> for RatingError {
    fn from(err: StoreError) -> Self {
        match err {
            // The unique constraint is an alternate path to the same outcome
            StoreError::DuplicateRating { reader_id, book_id } => {
                RatingError::DuplicateRating { reader_id, book_id }
            }
            other => RatingError::StorageFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_duplicate_maps_to_duplicate_rating() {
        let err = RatingError::from(StoreError::DuplicateRating {
            reader_id: ReaderId::new(7),
            book_id: BookId::new(12),
        });
        assert!(matches!(err, RatingError::DuplicateRating { .. }));
        assert_eq!(err.to_string(), "Reader 7 has already rated book 12");
    }

    #[test]
    fn other_store_errors_are_storage_failures() {
        let err = RatingError::from(StoreError::MissingReference {
            table: "books",
            id: 3,
        });
        assert_eq!(err.reason(), "storage_failure");
    }

    #[test]
    fn messages_name_the_failed_precondition() {
        assert_eq!(
            RatingError::ReaderNotFound(ReaderId::new(5)).to_string(),
            "Reader with id 5 not found"
        );
        assert_eq!(
            RatingError::BookNotFound(BookId::new(9)).to_string(),
            "Book with id 9 not found"
        );
        assert_eq!(
            RatingError::InvalidRatingValue(6).to_string(),
            "Invalid rating value 6: allowed values are 1-5"
        );
    }
}
