//! Human-readable and JSON output.

use std::io::Write;

use common::BookId;
use library_store::{BookListing, RatingSummary, Reader};
use ratings::{BookStats, RecordedRating};
use serde::Serialize;

const WIDE_RULE: usize = 50;
const NARROW_RULE: usize = 30;

fn rule(out: &mut impl Write, ch: char, width: usize) -> std::io::Result<()> {
    writeln!(out, "{}", ch.to_string().repeat(width))
}

pub fn recorded(out: &mut impl Write, recorded: &RecordedRating) -> std::io::Result<()> {
    writeln!(out, "Rating recorded successfully!")?;
    writeln!(out, "   Reader ID: {}", recorded.entry.reader_id)?;
    writeln!(out, "   Book ID: {}", recorded.entry.book_id)?;
    writeln!(out, "   Rating: {}/5", recorded.value)
}

pub fn recent(out: &mut impl Write, ratings: &[RatingSummary]) -> std::io::Result<()> {
    if ratings.is_empty() {
        return writeln!(out, "\nNo book ratings yet");
    }

    writeln!(out)?;
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "RECENT RATINGS:")?;
    rule(out, '-', WIDE_RULE)?;
    for rating in ratings {
        writeln!(
            out,
            "{} {} -> '{}' | Rating: {} | {}",
            rating.reader_first_name,
            rating.reader_last_name,
            rating.book_title,
            rating.rating_value,
            rating.rating_date.format("%Y-%m-%d %H:%M:%S %Z")
        )?;
    }
    Ok(())
}

pub fn stats(out: &mut impl Write, stats: &BookStats) -> std::io::Result<()> {
    writeln!(out, "\nStatistics for book \"{}\"", stats.title)?;

    let Some(aggregate) = stats.aggregate else {
        return writeln!(out, "   This book has no ratings yet");
    };

    writeln!(out, "   Average rating: {}/5", aggregate.average)?;
    writeln!(out, "   Number of ratings: {}", stats.rating_count)?;
    writeln!(out, "   Lowest rating: {}/5", aggregate.min)?;
    writeln!(out, "   Highest rating: {}/5", aggregate.max)?;
    writeln!(out, "   {}", aggregate.average.stars())
}

pub fn no_such_book(out: &mut impl Write, book_id: BookId) -> std::io::Result<()> {
    writeln!(out, "Book with id {book_id} not found!")
}

pub fn readers(out: &mut impl Write, readers: &[Reader]) -> std::io::Result<()> {
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "RANDOM READERS:")?;
    writeln!(out, "ID\tFirst name\tLast name")?;
    rule(out, '-', NARROW_RULE)?;
    for reader in readers {
        writeln!(
            out,
            "{}\t{}\t{}",
            reader.reader_id, reader.first_name, reader.last_name
        )?;
    }
    Ok(())
}

pub fn books(out: &mut impl Write, books: &[BookListing]) -> std::io::Result<()> {
    writeln!(out)?;
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "RANDOM BOOKS:")?;
    writeln!(out, "ID\tTitle")?;
    rule(out, '-', NARROW_RULE)?;
    for book in books {
        writeln!(
            out,
            "{}\t{} ({} {})",
            book.book_id, book.title, book.writer_first_name, book.writer_last_name
        )?;
    }
    Ok(())
}

/// Prints how to record a rating, with a concrete example when one is given.
pub fn usage_hint(out: &mut impl Write, example: Option<(i32, i32, u8)>) -> std::io::Result<()> {
    writeln!(out)?;
    rule(out, '=', WIDE_RULE)?;
    writeln!(out, "TO RATE A BOOK RUN:")?;
    writeln!(out, "library --reader <READER_ID> --book <BOOK_ID> --rating <1-5>")?;
    if let Some((reader, book, rating)) = example {
        writeln!(out, "\nEXAMPLE:")?;
        writeln!(out, "library --reader {reader} --book {book} --rating {rating}")?;
    }
    Ok(())
}

/// Stats as emitted with `--json`, stars included.
#[derive(Serialize)]
struct StatsJson<'a> {
    #[serde(flatten)]
    stats: &'a BookStats,
    stars: Option<String>,
}

#[derive(Serialize)]
struct NoSuchBookJson {
    error: &'static str,
    book_id: BookId,
}

pub fn stats_json(out: &mut impl Write, stats: &BookStats) -> Result<(), serde_json::Error> {
    let view = StatsJson {
        stats,
        stars: stats.stars(),
    };
    serde_json::to_writer_pretty(&mut *out, &view)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn no_such_book_json(out: &mut impl Write, book_id: BookId) -> Result<(), serde_json::Error> {
    let view = NoSuchBookJson {
        error: "book not found",
        book_id,
    };
    serde_json::to_writer_pretty(&mut *out, &view)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(serde_json::Error::io)
}
