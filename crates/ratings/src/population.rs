//! Synthetic writers, books and readers for an empty database.

use chrono::{Days, NaiveDate, Utc};
use common::WriterId;
use library_store::{LibraryStore, LibraryStoreExt, NewBook, NewReader, NewWriter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::RatingError;

const FIRST_NAMES: &[&str] = &[
    "Aleksandr", "Anna", "Boris", "Daria", "Dmitry", "Ekaterina", "Elena", "Fyodor", "Galina",
    "Igor", "Irina", "Ivan", "Kirill", "Ksenia", "Lev", "Marina", "Mikhail", "Natalia", "Nikolai",
    "Olga", "Pavel", "Polina", "Roman", "Sergei", "Sofia", "Tatiana", "Vera", "Viktor", "Yulia",
    "Zinaida",
];

const LAST_NAMES: &[&str] = &[
    "Alekseev", "Belova", "Volkov", "Gromova", "Egorov", "Zaitseva", "Ivanov", "Kuznetsova",
    "Lebedev", "Morozova", "Novikov", "Orlova", "Petrov", "Romanova", "Smirnov", "Sokolova",
    "Tarasov", "Fedorova", "Kharitonov", "Tsvetaeva", "Chekhov", "Sharova", "Yakovlev",
];

const TITLE_OPENERS: &[&str] = &[
    "Adaptive", "Balanced", "Centralized", "Distributed", "Enhanced", "Focused", "Innovative",
    "Integrated", "Open", "Persistent", "Quiet", "Reactive", "Silent", "Streamlined", "Universal",
    "Virtual",
];

const TITLE_MODIFIERS: &[&str] = &[
    "asymmetric", "bottom-line", "dynamic", "eternal", "global", "hybrid", "last", "local",
    "mobile", "northern", "secure", "static", "winter", "zero-defect",
];

const TITLE_NOUNS: &[&str] = &[
    "archive", "circle", "frontier", "garden", "harbor", "horizon", "journey", "legacy", "memory",
    "paradigm", "river", "station", "symphony", "threshold", "voyage",
];

/// Span of generated release dates, counted back from today.
const RELEASE_SPAN_DAYS: u64 = 30 * 365;

/// Span of generated registration dates, counted back from today.
const REGISTRATION_SPAN_DAYS: u64 = 5 * 365;

/// Produces plausible names, titles, dates and phone numbers.
pub struct SyntheticData<R: Rng> {
    rng: R,
    today: NaiveDate,
}

impl<R: Rng> SyntheticData<R> {
    pub fn new(rng: R, today: NaiveDate) -> Self {
        Self { rng, today }
    }

    fn pick(&mut self, words: &[&str]) -> String {
        words.choose(&mut self.rng).copied().unwrap_or_default().to_string()
    }

    fn date_within(&mut self, span_days: u64) -> NaiveDate {
        let back = self.rng.gen_range(0..=span_days);
        self.today
            .checked_sub_days(Days::new(back))
            .unwrap_or(self.today)
    }

    pub fn writer(&mut self) -> NewWriter {
        NewWriter {
            first_name: self.pick(FIRST_NAMES),
            last_name: self.pick(LAST_NAMES),
        }
    }

    /// Generates a book owned by a random writer. None if there are no writers.
    pub fn book(&mut self, writer_ids: &[WriterId]) -> Option<NewBook> {
        let writer_id = *writer_ids.choose(&mut self.rng)?;
        let title = format!(
            "{} {} {}",
            self.pick(TITLE_OPENERS),
            self.pick(TITLE_MODIFIERS),
            self.pick(TITLE_NOUNS)
        );
        Some(NewBook {
            title,
            release_date: self.date_within(RELEASE_SPAN_DAYS),
            writer_id,
        })
    }

    pub fn reader(&mut self) -> NewReader {
        let phone_number = format!(
            "+7 (9{:02}) {:03}-{:02}-{:02}",
            self.rng.gen_range(0..100),
            self.rng.gen_range(0..1000),
            self.rng.gen_range(0..100),
            self.rng.gen_range(0..100)
        );
        NewReader {
            first_name: self.pick(FIRST_NAMES),
            last_name: self.pick(LAST_NAMES),
            phone_number,
            registration_date: self.date_within(REGISTRATION_SPAN_DAYS),
        }
    }
}

/// Number of rows inserted per table by [`Populator::populate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub writers: u64,
    pub books: u64,
    pub readers: u64,
}

/// Fills an empty store with synthetic writers, books and readers.
pub struct Populator<S: LibraryStore, R: Rng> {
    store: S,
    data: SyntheticData<R>,
}

impl<S: LibraryStore> Populator<S, StdRng> {
    /// Creates a populator seeded from OS entropy, dating rows from today.
    pub fn new(store: S) -> Self {
        Self::with_data(
            store,
            SyntheticData::new(StdRng::from_entropy(), Utc::now().date_naive()),
        )
    }
}

impl<S: LibraryStore, R: Rng> Populator<S, R> {
    pub fn with_data(store: S, data: SyntheticData<R>) -> Self {
        Self { store, data }
    }

    /// True only when writers, books and readers are all empty.
    pub async fn should_populate(&self) -> Result<bool, RatingError> {
        Ok(self.store.is_unpopulated().await?)
    }

    pub async fn populate_writers(&mut self, count: usize) -> Result<u64, RatingError> {
        let writers = (0..count).map(|_| self.data.writer()).collect();
        let inserted = self.store.insert_writers(writers).await?;
        tracing::info!(inserted, "writers added");
        Ok(inserted)
    }

    /// Adds books owned by randomly chosen existing writers.
    ///
    /// Inserts nothing when there are no writers yet.
    pub async fn populate_books(&mut self, count: usize) -> Result<u64, RatingError> {
        let writer_ids = self.store.writer_ids().await?;
        if writer_ids.is_empty() {
            tracing::warn!("no writers in the database, skipping books");
            return Ok(0);
        }

        let books = (0..count)
            .filter_map(|_| self.data.book(&writer_ids))
            .collect();
        let inserted = self.store.insert_books(books).await?;
        tracing::info!(inserted, "books added");
        Ok(inserted)
    }

    pub async fn populate_readers(&mut self, count: usize) -> Result<u64, RatingError> {
        let readers = (0..count).map(|_| self.data.reader()).collect();
        let inserted = self.store.insert_readers(readers).await?;
        tracing::info!(inserted, "readers added");
        Ok(inserted)
    }

    /// Adds `count` writers, then `count` books, then `count` readers.
    #[tracing::instrument(skip(self))]
    pub async fn populate(&mut self, count: usize) -> Result<PopulationReport, RatingError> {
        Ok(PopulationReport {
            writers: self.populate_writers(count).await?,
            books: self.populate_books(count).await?,
            readers: self.populate_readers(count).await?,
        })
    }
}
