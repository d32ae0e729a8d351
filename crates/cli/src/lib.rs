//! Command-line front end for the library ratings system.
//!
//! Dispatches the parsed [`Action`] to the rating services and renders the
//! outcome as text or JSON. The binary wires this to PostgreSQL; tests drive
//! it with the in-memory store.

pub mod args;
pub mod config;
pub mod error;
pub mod render;

use std::io::{BufRead, Write};

use common::BookId;
use library_store::LibraryStore;
use rand::Rng;
use rand::seq::SliceRandom;
use ratings::{BookStatsOutcome, Populator, RatingService};

pub use args::{Action, Cli};
pub use config::Config;
pub use error::CliError;

/// Number of readers and books listed in the overview.
pub const OVERVIEW_SIZE: usize = 20;

/// Output options shared by every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub recent_limit: usize,
}

impl From<&Cli> for OutputOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            recent_limit: cli.limit,
        }
    }
}

/// Fills an empty store with `count` synthetic rows per table.
///
/// Returns true if population ran.
pub async fn populate_if_empty<S: LibraryStore + Clone>(
    store: &S,
    count: usize,
) -> Result<bool, CliError> {
    let mut populator = Populator::new(store.clone());
    if !populator.should_populate().await? {
        tracing::info!("data already present, skipping population");
        return Ok(false);
    }

    tracing::info!(count, "populating empty database");
    let report = populator.populate(count).await?;
    tracing::info!(
        writers = report.writers,
        books = report.books,
        readers = report.readers,
        "population finished"
    );
    Ok(true)
}

/// Runs one action against the store, writing results to `out`.
///
/// `input` is read only when the statistics action needs to prompt for a
/// book id.
pub async fn execute<S: LibraryStore + Clone>(
    store: &S,
    action: Action,
    options: OutputOptions,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<(), CliError> {
    let service = RatingService::new(store.clone());

    match action {
        Action::Overview => overview(store, &service, options, out).await,
        Action::Record {
            reader_id,
            book_id,
            rating_value,
        } => {
            let recorded = service.record(reader_id, book_id, rating_value).await?;
            let recent = service.recent(options.recent_limit).await?;
            if options.json {
                render::json(out, &serde_json::json!({ "recorded": recorded, "recent": recent }))?;
            } else {
                render::recorded(out, &recorded)?;
                render::recent(out, &recent)?;
            }
            Ok(())
        }
        Action::Stats(book_id) => {
            let book_id = match book_id {
                Some(id) => id,
                None => prompt_book_id(out, input)?,
            };
            match service.stats(book_id).await? {
                BookStatsOutcome::Found(stats) if options.json => render::stats_json(out, &stats)?,
                BookStatsOutcome::Found(stats) => render::stats(out, &stats)?,
                BookStatsOutcome::NoSuchBook(id) if options.json => {
                    render::no_such_book_json(out, id)?
                }
                BookStatsOutcome::NoSuchBook(id) => render::no_such_book(out, id)?,
            }
            Ok(())
        }
    }
}

async fn overview<S: LibraryStore + Clone>(
    store: &S,
    service: &RatingService<S>,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let readers = store.random_readers(OVERVIEW_SIZE).await?;
    let books = store.random_books(OVERVIEW_SIZE).await?;
    let recent = service.recent(options.recent_limit).await?;

    if options.json {
        render::json(
            out,
            &serde_json::json!({ "readers": readers, "books": books, "recent": recent }),
        )?;
        return Ok(());
    }

    render::readers(out, &readers)?;
    render::books(out, &books)?;
    render::recent(out, &recent)?;

    let mut rng = rand::thread_rng();
    let example = readers
        .choose(&mut rng)
        .zip(books.choose(&mut rng))
        .map(|(reader, book)| {
            (
                reader.reader_id.as_i32(),
                book.book_id.as_i32(),
                rng.gen_range(1..=5),
            )
        });
    render::usage_hint(out, example)?;
    Ok(())
}

/// Prompts for a book id and reads one line from `input`.
///
/// The answer must consist of ASCII digits only.
pub fn prompt_book_id(out: &mut impl Write, input: &mut impl BufRead) -> Result<BookId, CliError> {
    write!(out, "Enter book ID: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_book_id(line.trim())
}

/// Parses a non-negative integer book id.
pub fn parse_book_id(raw: &str) -> Result<BookId, CliError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CliError::InvalidBookId(raw.to_string()));
    }
    raw.parse::<i32>()
        .map(BookId::new)
        .map_err(|_| CliError::InvalidBookId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_id_must_be_digits() {
        assert_eq!(parse_book_id("42").unwrap(), BookId::new(42));
        assert_eq!(parse_book_id("007").unwrap(), BookId::new(7));
        for raw in ["", "-1", "4.2", "abc", "12a", " 1"] {
            assert!(matches!(parse_book_id(raw), Err(CliError::InvalidBookId(_))));
        }
    }

    #[test]
    fn book_id_overflow_is_invalid() {
        assert!(matches!(
            parse_book_id("99999999999"),
            Err(CliError::InvalidBookId(_))
        ));
    }

    #[test]
    fn prompt_reads_one_line() {
        let mut out = Vec::new();
        let mut input = std::io::Cursor::new("15\nignored\n");
        let id = prompt_book_id(&mut out, &mut input).unwrap();
        assert_eq!(id, BookId::new(15));
        assert_eq!(String::from_utf8(out).unwrap(), "Enter book ID: ");
    }
}
