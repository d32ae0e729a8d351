//! Relational store for the library ratings system.
//!
//! - [`LibraryStore`] trait with the queries and inserts the rating services need
//! - [`PostgresLibraryStore`] backed by sqlx, with transactional inserts
//! - [`InMemoryLibraryStore`] with the same constraints, for tests and demos

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryLibraryStore;
pub use model::{
    Book, BookListing, BookRatings, NewBook, NewRatingEntry, NewReader, NewWriter, RatingEntry,
    RatingScale, RatingSummary, Reader, TableCounts, Writer,
};
pub use postgres::PostgresLibraryStore;
pub use store::{DEFAULT_RECENT_LIMIT, LibraryStore, LibraryStoreExt};
