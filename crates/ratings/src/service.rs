//! Rating service bundling the write path and the read paths over one store.

use common::{BookId, ReaderId};
use library_store::{LibraryStore, RatingSummary};

use crate::error::RatingError;
use crate::recent::RecentRatingsReporter;
use crate::recorder::{RatingRecorder, RecordedRating};
use crate::stats::{BookStatsOutcome, StatsAggregator};

/// Service for recording and reporting ratings.
///
/// Each component gets its own handle to the same store; stores are cheap to
/// clone (a connection pool or a shared in-memory table set).
pub struct RatingService<S: LibraryStore + Clone> {
    recorder: RatingRecorder<S>,
    aggregator: StatsAggregator<S>,
    reporter: RecentRatingsReporter<S>,
}

impl<S: LibraryStore + Clone> RatingService<S> {
    /// Creates a new rating service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            recorder: RatingRecorder::new(store.clone()),
            aggregator: StatsAggregator::new(store.clone()),
            reporter: RecentRatingsReporter::new(store),
        }
    }

    /// Validates and records a rating.
    pub async fn record(
        &self,
        reader_id: ReaderId,
        book_id: BookId,
        rating_value: i64,
    ) -> Result<RecordedRating, RatingError> {
        self.recorder.record(reader_id, book_id, rating_value).await
    }

    /// Computes rating statistics for a book.
    pub async fn stats(&self, book_id: BookId) -> Result<BookStatsOutcome, RatingError> {
        self.aggregator.stats(book_id).await
    }

    /// Returns up to `limit` of the latest ratings.
    pub async fn recent(&self, limit: usize) -> Result<Vec<RatingSummary>, RatingError> {
        self.reporter.recent(limit).await
    }
}
