//! The most recently recorded ratings.

use library_store::{DEFAULT_RECENT_LIMIT, LibraryStore, RatingSummary};

use crate::error::RatingError;

/// Lists the latest ratings with reader and book names resolved.
pub struct RecentRatingsReporter<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> RecentRatingsReporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns up to `limit` ratings, newest first. Empty when nothing is rated.
    #[tracing::instrument(skip(self))]
    pub async fn recent(&self, limit: usize) -> Result<Vec<RatingSummary>, RatingError> {
        Ok(self.store.recent_ratings(limit).await?)
    }

    /// Returns the latest ratings using the default limit of five.
    pub async fn latest(&self) -> Result<Vec<RatingSummary>, RatingError> {
        self.recent(DEFAULT_RECENT_LIMIT).await
    }
}
