use async_trait::async_trait;
use common::{BookId, RatingScaleId, RatingValue, ReaderId, WriterId};

use crate::{
    Result,
    model::{
        BookListing, BookRatings, NewBook, NewRatingEntry, NewReader, NewWriter, RatingEntry,
        RatingScale, RatingSummary, Reader, TableCounts,
    },
};

/// Default number of rows returned by [`LibraryStore::recent_ratings`].
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Core trait for library store implementations.
///
/// A library store persists writers, books, readers and the ratings readers
/// give to books. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Returns true if a reader with this id exists.
    async fn reader_exists(&self, reader_id: ReaderId) -> Result<bool>;

    /// Returns true if a book with this id exists.
    async fn book_exists(&self, book_id: BookId) -> Result<bool>;

    /// Returns true if the reader has already rated the book.
    async fn rating_exists(&self, reader_id: ReaderId, book_id: BookId) -> Result<bool>;

    /// Resolves a scale value to its internal identifier.
    ///
    /// Returns None if the scale has no row for this value.
    async fn rating_scale_id(&self, value: RatingValue) -> Result<Option<RatingScaleId>>;

    /// Returns the whole rating scale ordered by value.
    async fn rating_scale(&self) -> Result<Vec<RatingScale>>;

    /// Inserts a rating atomically.
    ///
    /// Either the row exists with every field populated afterwards, or the
    /// call fails and nothing was written. A second rating for the same
    /// `(reader, book)` pair fails with `DuplicateRating`.
    async fn insert_rating(&self, entry: NewRatingEntry) -> Result<RatingEntry>;

    /// Loads a book and the values of all its ratings.
    ///
    /// Returns None if the book doesn't exist.
    async fn book_ratings(&self, book_id: BookId) -> Result<Option<BookRatings>>;

    /// Returns the most recent ratings, newest first, at most `limit` rows.
    async fn recent_ratings(&self, limit: usize) -> Result<Vec<RatingSummary>>;

    /// Inserts writers in one transaction and returns the number inserted.
    async fn insert_writers(&self, writers: Vec<NewWriter>) -> Result<u64>;

    /// Inserts books in one transaction and returns the number inserted.
    async fn insert_books(&self, books: Vec<NewBook>) -> Result<u64>;

    /// Inserts readers in one transaction and returns the number inserted.
    async fn insert_readers(&self, readers: Vec<NewReader>) -> Result<u64>;

    /// Returns the ids of all writers.
    async fn writer_ids(&self) -> Result<Vec<WriterId>>;

    /// Counts writers, books and readers.
    async fn table_counts(&self) -> Result<TableCounts>;

    /// Returns up to `limit` readers in random order.
    async fn random_readers(&self, limit: usize) -> Result<Vec<Reader>>;

    /// Returns up to `limit` books with their writer names in random order.
    async fn random_books(&self, limit: usize) -> Result<Vec<BookListing>>;
}

/// Extension trait providing convenience methods for library stores.
#[async_trait]
pub trait LibraryStoreExt: LibraryStore {
    /// Returns true when no writers, books or readers have been stored yet.
    async fn is_unpopulated(&self) -> Result<bool> {
        Ok(self.table_counts().await?.is_empty())
    }

    /// Returns the latest ratings using the default limit.
    async fn latest_ratings(&self) -> Result<Vec<RatingSummary>> {
        self.recent_ratings(DEFAULT_RECENT_LIMIT).await
    }
}

// Blanket implementation for all LibraryStore implementations
impl<T: LibraryStore + ?Sized> LibraryStoreExt for T {}
