//! Rows of the library schema and the shapes read back from joins.

use chrono::{DateTime, NaiveDate, Utc};
use common::{BookId, RatingEntryId, RatingScaleId, RatingValue, ReaderId, WriterId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Writer {
    pub writer_id: WriterId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub release_date: NaiveDate,
    pub writer_id: WriterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reader {
    pub reader_id: ReaderId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub registration_date: NaiveDate,
}

/// One entry of the static rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingScale {
    pub rating_id: RatingScaleId,
    pub rating_value: RatingValue,
}

/// A stored rating of a book by a reader.
///
/// `rating_date` is assigned by the store when the row is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingEntry {
    pub rating_entry_id: RatingEntryId,
    pub reader_id: ReaderId,
    pub book_id: BookId,
    pub rating_id: RatingScaleId,
    pub rating_date: DateTime<Utc>,
}

/// Fields supplied by the caller when inserting a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRatingEntry {
    pub reader_id: ReaderId,
    pub book_id: BookId,
    pub rating_id: RatingScaleId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWriter {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub release_date: NaiveDate,
    pub writer_id: WriterId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReader {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub registration_date: NaiveDate,
}

/// A book together with the scale values of all its ratings.
///
/// `values` is empty when the book exists but has not been rated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRatings {
    pub book: Book,
    pub values: Vec<RatingValue>,
}

/// A rating joined with the names it refers to, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingSummary {
    pub rating_entry_id: RatingEntryId,
    pub reader_id: ReaderId,
    pub reader_first_name: String,
    pub reader_last_name: String,
    pub book_id: BookId,
    pub book_title: String,
    pub rating_value: RatingValue,
    pub rating_date: DateTime<Utc>,
}

/// A book joined with its writer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookListing {
    pub book_id: BookId,
    pub title: String,
    pub writer_first_name: String,
    pub writer_last_name: String,
}

/// Row counts of the tables filled by population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub writers: u64,
    pub books: u64,
    pub readers: u64,
}

impl TableCounts {
    /// Returns true when writers, books and readers are all empty.
    pub fn is_empty(&self) -> bool {
        self.writers == 0 && self.books == 0 && self.readers == 0
    }
}
