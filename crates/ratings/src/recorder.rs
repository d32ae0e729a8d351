//! The single write path: validate, then insert one rating atomically.

use common::{BookId, RatingValue, ReaderId};
use library_store::{LibraryStore, NewRatingEntry, RatingEntry};
use serde::Serialize;

use crate::error::RatingError;
use crate::validator::RatingValidator;

/// A rating that was committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedRating {
    pub entry: RatingEntry,
    pub value: RatingValue,
}

/// Records ratings after validating them.
///
/// Validation always completes before the insert is attempted; a failed
/// validation never reaches the write path.
pub struct RatingRecorder<S: LibraryStore> {
    validator: RatingValidator<S>,
}

impl<S: LibraryStore> RatingRecorder<S> {
    /// Creates a recorder writing to the given store.
    pub fn new(store: S) -> Self {
        Self {
            validator: RatingValidator::new(store),
        }
    }

    /// Returns a reference to the validator used before each insert.
    pub fn validator(&self) -> &RatingValidator<S> {
        &self.validator
    }

    /// Records a reader's rating of a book.
    ///
    /// The insert runs in its own transaction. A storage failure rolls it
    /// back and is returned as `StorageFailure`; a uniqueness violation
    /// raised by the store is returned as `DuplicateRating`.
    #[tracing::instrument(skip(self))]
    pub async fn record(
        &self,
        reader_id: ReaderId,
        book_id: BookId,
        rating_value: i64,
    ) -> Result<RecordedRating, RatingError> {
        let result = self.try_record(reader_id, book_id, rating_value).await;

        match &result {
            Ok(recorded) => {
                metrics::counter!("ratings_recorded_total").increment(1);
                tracing::info!(
                    rating_entry_id = %recorded.entry.rating_entry_id,
                    value = %recorded.value,
                    "rating recorded"
                );
            }
            Err(err) => {
                metrics::counter!("ratings_rejected_total", "reason" => err.reason())
                    .increment(1);
                match err {
                    RatingError::StorageFailure(cause) => {
                        tracing::error!(error = %cause, "rating insert failed, rolled back");
                    }
                    _ => tracing::warn!(reason = err.reason(), "rating rejected"),
                }
            }
        }

        result
    }

    async fn try_record(
        &self,
        reader_id: ReaderId,
        book_id: BookId,
        rating_value: i64,
    ) -> Result<RecordedRating, RatingError> {
        let rating_id = self
            .validator
            .validate(reader_id, book_id, rating_value)
            .await?;

        // Already checked by the validator
        let value =
            RatingValue::new(rating_value).map_err(|e| RatingError::InvalidRatingValue(e.0))?;

        let entry = self
            .validator
            .store()
            .insert_rating(NewRatingEntry {
                reader_id,
                book_id,
                rating_id,
            })
            .await?;

        Ok(RecordedRating { entry, value })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use common::{RatingScaleId, WriterId};
    use library_store::{
        BookListing, BookRatings, InMemoryLibraryStore, NewBook, NewReader, NewWriter,
        RatingScale, RatingSummary, Reader, StoreError, TableCounts,
    };

    use super::*;
    use crate::test_support::seeded_store;

    /// Delegates to an in-memory store but can fail or race the insert.
    struct FaultyStore {
        inner: InMemoryLibraryStore,
        mode: InsertMode,
        inserts: AtomicUsize,
    }

    enum InsertMode {
        /// The insert fails as if the connection dropped.
        Fail,
        /// Another writer inserts the same pair right before this insert.
        Race,
    }

    #[async_trait]
    impl LibraryStore for FaultyStore {
        async fn reader_exists(&self, reader_id: ReaderId) -> library_store::Result<bool> {
            self.inner.reader_exists(reader_id).await
        }

        async fn book_exists(&self, book_id: BookId) -> library_store::Result<bool> {
            self.inner.book_exists(book_id).await
        }

        async fn rating_exists(
            &self,
            reader_id: ReaderId,
            book_id: BookId,
        ) -> library_store::Result<bool> {
            self.inner.rating_exists(reader_id, book_id).await
        }

        async fn rating_scale_id(
            &self,
            value: RatingValue,
        ) -> library_store::Result<Option<RatingScaleId>> {
            self.inner.rating_scale_id(value).await
        }

        async fn rating_scale(&self) -> library_store::Result<Vec<RatingScale>> {
            self.inner.rating_scale().await
        }

        async fn insert_rating(&self, entry: NewRatingEntry) -> library_store::Result<RatingEntry> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                InsertMode::Fail => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
                InsertMode::Race => {
                    self.inner.insert_rating(entry).await?;
                    self.inner.insert_rating(entry).await
                }
            }
        }

        async fn book_ratings(&self, book_id: BookId) -> library_store::Result<Option<BookRatings>> {
            self.inner.book_ratings(book_id).await
        }

        async fn recent_ratings(&self, limit: usize) -> library_store::Result<Vec<RatingSummary>> {
            self.inner.recent_ratings(limit).await
        }

        async fn insert_writers(&self, writers: Vec<NewWriter>) -> library_store::Result<u64> {
            self.inner.insert_writers(writers).await
        }

        async fn insert_books(&self, books: Vec<NewBook>) -> library_store::Result<u64> {
            self.inner.insert_books(books).await
        }

        async fn insert_readers(&self, readers: Vec<NewReader>) -> library_store::Result<u64> {
            self.inner.insert_readers(readers).await
        }

        async fn writer_ids(&self) -> library_store::Result<Vec<WriterId>> {
            self.inner.writer_ids().await
        }

        async fn table_counts(&self) -> library_store::Result<TableCounts> {
            self.inner.table_counts().await
        }

        async fn random_readers(&self, limit: usize) -> library_store::Result<Vec<Reader>> {
            self.inner.random_readers(limit).await
        }

        async fn random_books(&self, limit: usize) -> library_store::Result<Vec<BookListing>> {
            self.inner.random_books(limit).await
        }
    }

    async fn faulty(mode: InsertMode) -> FaultyStore {
        FaultyStore {
            inner: seeded_store(1, 1).await,
            mode,
            inserts: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn records_once_then_rejects_duplicate() {
        let store = seeded_store(1, 1).await;
        let recorder = RatingRecorder::new(store.clone());

        let recorded = recorder
            .record(ReaderId::new(1), BookId::new(1), 4)
            .await
            .unwrap();
        assert_eq!(recorded.value, RatingValue::new(4).unwrap());
        assert_eq!(recorded.entry.reader_id, ReaderId::new(1));
        assert_eq!(store.rating_count().await, 1);

        for value in 1..=5 {
            let again = recorder.record(ReaderId::new(1), BookId::new(1), value).await;
            assert!(matches!(again, Err(RatingError::DuplicateRating { .. })));
        }
        assert_eq!(store.rating_count().await, 1);
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_insert() {
        let store = faulty(InsertMode::Fail).await;
        let recorder = RatingRecorder::new(store);

        let result = recorder.record(ReaderId::new(2), BookId::new(1), 3).await;
        assert!(matches!(result, Err(RatingError::ReaderNotFound(_))));

        let result = recorder.record(ReaderId::new(1), BookId::new(1), 7).await;
        assert!(matches!(result, Err(RatingError::InvalidRatingValue(7))));

        let store = recorder.validator().store();
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failure_is_reported_and_nothing_is_written() {
        let recorder = RatingRecorder::new(faulty(InsertMode::Fail).await);

        let result = recorder.record(ReaderId::new(1), BookId::new(1), 3).await;
        assert!(matches!(
            result,
            Err(RatingError::StorageFailure(StoreError::Database(_)))
        ));

        let store = recorder.validator().store();
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.rating_count().await, 0);
    }

    #[tokio::test]
    async fn constraint_violation_is_a_duplicate_rating() {
        let recorder = RatingRecorder::new(faulty(InsertMode::Race).await);

        let result = recorder.record(ReaderId::new(1), BookId::new(1), 2).await;
        assert!(matches!(
            result,
            Err(RatingError::DuplicateRating { reader_id, book_id })
                if reader_id == ReaderId::new(1) && book_id == BookId::new(1)
        ));
        assert_eq!(recorder.validator().store().inner.rating_count().await, 1);
    }
}
