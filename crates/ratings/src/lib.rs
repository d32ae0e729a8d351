//! Rating validation, recording and statistics.
//!
//! - [`RatingValidator`] checks that a rating may be recorded
//! - [`RatingRecorder`] validates, then inserts the rating in one transaction
//! - [`StatsAggregator`] computes count, average, min and max per book
//! - [`RecentRatingsReporter`] lists the latest ratings
//! - [`Populator`] fills an empty database with synthetic data

pub mod error;
pub mod population;
pub mod recent;
pub mod recorder;
pub mod service;
pub mod stats;
pub mod validator;

pub use error::RatingError;
pub use population::{PopulationReport, Populator, SyntheticData};
pub use recent::RecentRatingsReporter;
pub use recorder::{RatingRecorder, RecordedRating};
pub use service::RatingService;
pub use stats::{AverageRating, BookStats, BookStatsOutcome, RatingAggregate, StatsAggregator};
pub use validator::RatingValidator;
