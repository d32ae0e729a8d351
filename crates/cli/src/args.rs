//! Command-line arguments.

use clap::Parser;
use common::{BookId, ReaderId};
use library_store::DEFAULT_RECENT_LIMIT;

/// Book rating system: record ratings and show book statistics.
#[derive(Debug, Parser)]
#[command(name = "library", author, version, about, long_about = None)]
pub struct Cli {
    /// Reader ID
    #[arg(long, requires_all = ["book", "rating"])]
    pub reader: Option<i32>,

    /// Book ID
    #[arg(long, requires_all = ["reader", "rating"])]
    pub book: Option<i32>,

    /// Rating of the book (1-5)
    #[arg(
        long,
        requires_all = ["reader", "book"],
        value_parser = clap::value_parser!(i64).range(1..=5),
    )]
    pub rating: Option<i64>,

    /// Show rating statistics of a book; prompts for the ID when omitted
    #[arg(
        long,
        value_name = "BOOK_ID",
        num_args = 0..=1,
        conflicts_with_all = ["reader", "book", "rating"],
    )]
    pub stats: Option<Option<i32>>,

    /// Number of recent ratings to show
    #[arg(long, env = "LIBRARY_RECENT_LIMIT", default_value_t = DEFAULT_RECENT_LIMIT)]
    pub limit: usize,

    /// Print statistics and ratings as JSON
    #[arg(long)]
    pub json: bool,
}

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No action flags: list random readers and books and recent ratings.
    Overview,
    Record {
        reader_id: ReaderId,
        book_id: BookId,
        rating_value: i64,
    },
    /// Statistics for a book; None means the id has to be prompted for.
    Stats(Option<BookId>),
}

impl Cli {
    pub fn action(&self) -> Action {
        match (self.reader, self.book, self.rating, self.stats) {
            (Some(reader), Some(book), Some(rating_value), _) => Action::Record {
                reader_id: ReaderId::new(reader),
                book_id: BookId::new(book),
                rating_value,
            },
            (_, _, _, Some(book)) => Action::Stats(book.map(BookId::new)),
            // clap rejects partial record arguments before this point
            _ => Action::Overview,
        }
    }
}
