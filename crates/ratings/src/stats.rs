//! Aggregate rating statistics for a single book.

use common::{BookId, RatingValue};
use library_store::LibraryStore;
use serde::{Serialize, Serializer};

use crate::error::RatingError;

const FULL_STAR: char = '★';
const HALF_STAR: char = '½';

/// Average rating rounded to two decimal places.
///
/// Held in hundredths to avoid floating point drift (e.g. 460 = 4.60).
/// Rounding is half away from zero, as `ROUND(numeric, 2)` does in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AverageRating {
    hundredths: u32,
}

impl AverageRating {
    /// Averages the given values. Returns None if there are none.
    pub fn of(values: &[RatingValue]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len() as u64;
        let sum: u64 = values.iter().map(|v| u64::from(v.get())).sum();
        // round(sum * 100 / count) for positive operands
        let hundredths = (sum * 200 + count) / (count * 2);
        Some(Self {
            hundredths: u32::try_from(hundredths).unwrap_or(u32::MAX),
        })
    }

    /// Creates an average from a value in hundredths.
    pub fn from_hundredths(hundredths: u32) -> Self {
        Self { hundredths }
    }

    pub fn hundredths(&self) -> u32 {
        self.hundredths
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }

    /// Number of whole stars: the average rounded down.
    pub fn full_stars(&self) -> u32 {
        self.hundredths / 100
    }

    /// True when the fractional part is at least one half.
    pub fn has_half_star(&self) -> bool {
        self.hundredths % 100 >= 50
    }

    /// Renders the average as star glyphs, e.g. `★★★★½` for 4.60.
    pub fn stars(&self) -> String {
        let mut stars: String = std::iter::repeat_n(FULL_STAR, self.full_stars() as usize).collect();
        if self.has_half_star() {
            stars.push(HALF_STAR);
        }
        stars
    }
}

impl std::fmt::Display for AverageRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for AverageRating {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Average, minimum and maximum over at least one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingAggregate {
    pub average: AverageRating,
    pub min: RatingValue,
    pub max: RatingValue,
}

impl RatingAggregate {
    /// Aggregates the given values. Returns None if there are none.
    pub fn of(values: &[RatingValue]) -> Option<Self> {
        Some(Self {
            average: AverageRating::of(values)?,
            min: *values.iter().min()?,
            max: *values.iter().max()?,
        })
    }
}

/// Rating statistics of a book that exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookStats {
    pub book_id: BookId,
    pub title: String,
    pub rating_count: u64,
    /// None until the book receives its first rating.
    pub aggregate: Option<RatingAggregate>,
}

impl BookStats {
    pub fn average(&self) -> Option<AverageRating> {
        self.aggregate.map(|a| a.average)
    }

    /// Star glyphs for the average, None when the book is unrated.
    pub fn stars(&self) -> Option<String> {
        self.average().map(|a| a.stars())
    }

    pub fn is_rated(&self) -> bool {
        self.aggregate.is_some()
    }
}

/// Outcome of a statistics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookStatsOutcome {
    Found(BookStats),
    /// No book has the requested id. Distinct from a book with no ratings.
    NoSuchBook(BookId),
}

/// Computes rating statistics per book.
pub struct StatsAggregator<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> StatsAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Computes count, average, minimum and maximum over all ratings of a book.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self, book_id: BookId) -> Result<BookStatsOutcome, RatingError> {
        metrics::counter!("rating_stats_requests_total").increment(1);

        let Some(ratings) = self.store.book_ratings(book_id).await? else {
            tracing::debug!("book not found");
            return Ok(BookStatsOutcome::NoSuchBook(book_id));
        };

        let stats = BookStats {
            book_id: ratings.book.book_id,
            title: ratings.book.title,
            rating_count: ratings.values.len() as u64,
            aggregate: RatingAggregate::of(&ratings.values),
        };
        tracing::debug!(rating_count = stats.rating_count, "book stats computed");

        Ok(BookStatsOutcome::Found(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RatingRecorder;
    use crate::test_support::seeded_store;

    fn values(raw: &[i64]) -> Vec<RatingValue> {
        raw.iter().map(|&v| RatingValue::new(v).unwrap()).collect()
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(AverageRating::of(&values(&[4])).unwrap().to_string(), "4.00");
        assert_eq!(AverageRating::of(&values(&[1, 2, 2])).unwrap().to_string(), "1.67");
        assert_eq!(AverageRating::of(&values(&[1, 1, 2])).unwrap().to_string(), "1.33");
        assert_eq!(AverageRating::of(&values(&[5, 5, 4, 4, 5])).unwrap().to_string(), "4.60");
    }

    #[test]
    fn average_rounds_half_away_from_zero() {
        // 1.125 -> 1.13
        let eight = values(&[1, 1, 1, 1, 1, 1, 1, 2]);
        assert_eq!(AverageRating::of(&eight).unwrap().hundredths(), 113);
    }

    #[test]
    fn average_of_nothing_is_undefined() {
        assert_eq!(AverageRating::of(&[]), None);
        assert_eq!(RatingAggregate::of(&[]), None);
    }

    #[test]
    fn stars_follow_floor_and_half() {
        assert_eq!(AverageRating::from_hundredths(460).stars(), "★★★★½");
        assert_eq!(AverageRating::from_hundredths(450).stars(), "★★★★½");
        assert_eq!(AverageRating::from_hundredths(449).stars(), "★★★★");
        assert_eq!(AverageRating::from_hundredths(500).stars(), "★★★★★");
        assert_eq!(AverageRating::from_hundredths(100).stars(), "★");
    }

    #[test]
    fn aggregate_tracks_min_and_max() {
        let aggregate = RatingAggregate::of(&values(&[3, 1, 5])).unwrap();
        assert_eq!(aggregate.min, RatingValue::MIN);
        assert_eq!(aggregate.max, RatingValue::MAX);
        assert_eq!(aggregate.average.to_string(), "3.00");
    }

    #[test]
    fn average_serializes_as_number() {
        let json = serde_json::to_value(AverageRating::from_hundredths(460)).unwrap();
        assert_eq!(json, serde_json::json!(4.6));
    }

    #[tokio::test]
    async fn missing_book_is_no_such_book() {
        let aggregator = StatsAggregator::new(seeded_store(1, 1).await);

        let outcome = aggregator.stats(BookId::new(999)).await.unwrap();
        assert_eq!(outcome, BookStatsOutcome::NoSuchBook(BookId::new(999)));
    }

    #[tokio::test]
    async fn unrated_book_has_zero_count_and_no_average() {
        let aggregator = StatsAggregator::new(seeded_store(1, 1).await);

        let BookStatsOutcome::Found(stats) = aggregator.stats(BookId::new(1)).await.unwrap() else {
            panic!("book 1 exists");
        };
        assert_eq!(stats.rating_count, 0);
        assert_eq!(stats.average(), None);
        assert_eq!(stats.stars(), None);
        assert!(!stats.is_rated());
    }

    #[tokio::test]
    async fn stats_over_recorded_ratings() {
        let store = seeded_store(5, 1).await;
        let recorder = RatingRecorder::new(store.clone());
        for (reader, value) in [(1, 5), (2, 5), (3, 4), (4, 4), (5, 5)] {
            recorder
                .record(common::ReaderId::new(reader), BookId::new(1), value)
                .await
                .unwrap();
        }

        let aggregator = StatsAggregator::new(store);
        let BookStatsOutcome::Found(stats) = aggregator.stats(BookId::new(1)).await.unwrap() else {
            panic!("book 1 exists");
        };
        assert_eq!(stats.rating_count, 5);
        assert_eq!(stats.average().unwrap().to_string(), "4.60");
        assert_eq!(stats.stars().unwrap(), "★★★★½");
        let aggregate = stats.aggregate.unwrap();
        assert_eq!(aggregate.min, RatingValue::new(4).unwrap());
        assert_eq!(aggregate.max, RatingValue::MAX);
    }
}
