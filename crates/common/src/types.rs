use serde::{Deserialize, Serialize};

/// Declares a typed wrapper around a `SERIAL` primary key.
///
/// Each table gets its own identifier type so a reader id can never be
/// passed where a book id is expected.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates an identifier from its raw database value.
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw database value.
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a row in `writers`.
    WriterId
);

define_id!(
    /// Identifier of a row in `books`.
    BookId
);

define_id!(
    /// Identifier of a row in `readers`.
    ReaderId
);

define_id!(
    /// Identifier of a row in the `ratings` scale table.
    RatingScaleId
);

define_id!(
    /// Identifier of a row in `book_ratings`.
    RatingEntryId
);
