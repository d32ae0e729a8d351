//! The fixed rating scale.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when an integer falls outside the rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating value {0} is outside the scale 1-5")]
pub struct OutOfScale(pub i64);

/// A value on the 1 to 5 rating scale.
///
/// Only the five scale values can be constructed, so a `RatingValue` held
/// anywhere in the system is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);

    /// Every value of the scale in ascending order.
    pub const ALL: [Self; 5] = [Self(1), Self(2), Self(3), Self(4), Self(5)];

    /// Creates a rating value, failing for anything outside 1..=5.
    pub fn new(value: i64) -> Result<Self, OutOfScale> {
        match value {
            1..=5 => Ok(Self(value as u8)),
            _ => Err(OutOfScale(value)),
        }
    }

    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = OutOfScale;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for RatingValue {
    type Error = OutOfScale;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<RatingValue> for i64 {
    fn from(value: RatingValue) -> Self {
        i64::from(value.0)
    }
}

impl From<RatingValue> for i32 {
    fn from(value: RatingValue) -> Self {
        i32::from(value.0)
    }
}
