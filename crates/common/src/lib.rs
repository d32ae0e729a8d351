//! Shared types for the library ratings system.

pub mod rating;
pub mod types;

pub use rating::{OutOfScale, RatingValue};
pub use types::{BookId, RatingEntryId, RatingScaleId, ReaderId, WriterId};
