//! Preconditions for recording a rating.

use common::{BookId, RatingScaleId, RatingValue, ReaderId};
use library_store::LibraryStore;

use crate::error::RatingError;

/// Read-only checks that decide whether a rating may be recorded.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. the value is on the scale (no store access)
/// 2. the reader exists
/// 3. the book exists
/// 4. the reader has not rated the book yet
/// 5. the scale has a row for the value
pub struct RatingValidator<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> RatingValidator<S> {
    /// Creates a validator reading from the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates a rating and resolves its value to the scale identifier.
    #[tracing::instrument(skip(self))]
    pub async fn validate(
        &self,
        reader_id: ReaderId,
        book_id: BookId,
        rating_value: i64,
    ) -> Result<RatingScaleId, RatingError> {
        let value =
            RatingValue::new(rating_value).map_err(|e| RatingError::InvalidRatingValue(e.0))?;

        if !self.store.reader_exists(reader_id).await? {
            return Err(RatingError::ReaderNotFound(reader_id));
        }

        if !self.store.book_exists(book_id).await? {
            return Err(RatingError::BookNotFound(book_id));
        }

        if self.store.rating_exists(reader_id, book_id).await? {
            return Err(RatingError::DuplicateRating { reader_id, book_id });
        }

        self.store
            .rating_scale_id(value)
            .await?
            .ok_or(RatingError::InvalidRatingValue(rating_value))
    }
}
