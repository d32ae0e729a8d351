use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{BookId, RatingEntryId, RatingScaleId, RatingValue, ReaderId, WriterId};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    model::{
        Book, BookListing, BookRatings, NewBook, NewRatingEntry, NewReader, NewWriter,
        RatingEntry, RatingScale, RatingSummary, Reader, TableCounts, Writer,
    },
    store::LibraryStore,
};

/// Tables of the in-memory store.
///
/// Identifiers are handed out sequentially from 1, as `SERIAL` columns do.
#[derive(Default)]
struct Tables {
    writers: Vec<Writer>,
    books: Vec<Book>,
    readers: Vec<Reader>,
    scale: Vec<RatingScale>,
    ratings: Vec<RatingEntry>,
}

impl Tables {
    fn reader(&self, reader_id: ReaderId) -> Option<&Reader> {
        self.readers.iter().find(|r| r.reader_id == reader_id)
    }

    fn book(&self, book_id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.book_id == book_id)
    }

    fn writer(&self, writer_id: WriterId) -> Option<&Writer> {
        self.writers.iter().find(|w| w.writer_id == writer_id)
    }

    fn scale_value(&self, rating_id: RatingScaleId) -> Option<RatingValue> {
        self.scale
            .iter()
            .find(|s| s.rating_id == rating_id)
            .map(|s| s.rating_value)
    }

    fn next_id(len: usize) -> i32 {
        i32::try_from(len).map_or(i32::MAX, |n| n.saturating_add(1))
    }
}

/// In-memory library store implementation for testing.
///
/// This implementation keeps every table in memory and provides
/// the same interface and constraints as the PostgreSQL implementation.
#[derive(Clone)]
pub struct InMemoryLibraryStore {
    tables: Arc<RwLock<Tables>>,
}

impl Default for InMemoryLibraryStore {
    fn default() -> Self {
        Self::with_rating_scale(&RatingValue::ALL)
    }
}

impl InMemoryLibraryStore {
    /// Creates an empty store with the full 1-5 rating scale seeded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose scale holds only the given values.
    pub fn with_rating_scale(values: &[RatingValue]) -> Self {
        let scale = values
            .iter()
            .enumerate()
            .map(|(i, &rating_value)| RatingScale {
                rating_id: RatingScaleId::new(Tables::next_id(i)),
                rating_value,
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(Tables {
                scale,
                ..Tables::default()
            })),
        }
    }

    /// Returns the number of ratings stored.
    pub async fn rating_count(&self) -> usize {
        self.tables.read().await.ratings.len()
    }

    /// Removes all writers, books, readers and ratings. The scale is kept.
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.writers.clear();
        tables.books.clear();
        tables.readers.clear();
        tables.ratings.clear();
    }
}

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn reader_exists(&self, reader_id: ReaderId) -> Result<bool> {
        Ok(self.tables.read().await.reader(reader_id).is_some())
    }

    async fn book_exists(&self, book_id: BookId) -> Result<bool> {
        Ok(self.tables.read().await.book(book_id).is_some())
    }

    async fn rating_exists(&self, reader_id: ReaderId, book_id: BookId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .iter()
            .any(|r| r.reader_id == reader_id && r.book_id == book_id))
    }

    async fn rating_scale_id(&self, value: RatingValue) -> Result<Option<RatingScaleId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scale
            .iter()
            .find(|s| s.rating_value == value)
            .map(|s| s.rating_id))
    }

    async fn rating_scale(&self) -> Result<Vec<RatingScale>> {
        let mut scale = self.tables.read().await.scale.clone();
        scale.sort_by_key(|s| s.rating_value);
        Ok(scale)
    }

    async fn insert_rating(&self, entry: NewRatingEntry) -> Result<RatingEntry> {
        // Constraints are checked and the row pushed under one write lock.
        let mut tables = self.tables.write().await;

        if tables.reader(entry.reader_id).is_none() {
            return Err(StoreError::MissingReference {
                table: "readers",
                id: entry.reader_id.as_i32(),
            });
        }
        if tables.book(entry.book_id).is_none() {
            return Err(StoreError::MissingReference {
                table: "books",
                id: entry.book_id.as_i32(),
            });
        }
        if tables.scale_value(entry.rating_id).is_none() {
            return Err(StoreError::MissingReference {
                table: "ratings",
                id: entry.rating_id.as_i32(),
            });
        }

        // Unique constraint simulation
        if tables
            .ratings
            .iter()
            .any(|r| r.reader_id == entry.reader_id && r.book_id == entry.book_id)
        {
            return Err(StoreError::DuplicateRating {
                reader_id: entry.reader_id,
                book_id: entry.book_id,
            });
        }

        let stored = RatingEntry {
            rating_entry_id: RatingEntryId::new(Tables::next_id(tables.ratings.len())),
            reader_id: entry.reader_id,
            book_id: entry.book_id,
            rating_id: entry.rating_id,
            rating_date: Utc::now(),
        };
        tables.ratings.push(stored.clone());

        Ok(stored)
    }

    async fn book_ratings(&self, book_id: BookId) -> Result<Option<BookRatings>> {
        let tables = self.tables.read().await;
        let Some(book) = tables.book(book_id).cloned() else {
            return Ok(None);
        };

        let values = tables
            .ratings
            .iter()
            .filter(|r| r.book_id == book_id)
            .filter_map(|r| tables.scale_value(r.rating_id))
            .collect();

        Ok(Some(BookRatings { book, values }))
    }

    async fn recent_ratings(&self, limit: usize) -> Result<Vec<RatingSummary>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<_> = tables.ratings.iter().collect();
        entries.sort_by(|a, b| {
            b.rating_date
                .cmp(&a.rating_date)
                .then(b.rating_entry_id.cmp(&a.rating_entry_id))
        });

        let summaries = entries
            .into_iter()
            .filter_map(|entry| {
                let reader = tables.reader(entry.reader_id)?;
                let book = tables.book(entry.book_id)?;
                let rating_value = tables.scale_value(entry.rating_id)?;
                Some(RatingSummary {
                    rating_entry_id: entry.rating_entry_id,
                    reader_id: reader.reader_id,
                    reader_first_name: reader.first_name.clone(),
                    reader_last_name: reader.last_name.clone(),
                    book_id: book.book_id,
                    book_title: book.title.clone(),
                    rating_value,
                    rating_date: entry.rating_date,
                })
            })
            .take(limit)
            .collect();

        Ok(summaries)
    }

    async fn insert_writers(&self, writers: Vec<NewWriter>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let count = writers.len() as u64;
        for writer in writers {
            let writer_id = WriterId::new(Tables::next_id(tables.writers.len()));
            tables.writers.push(Writer {
                writer_id,
                first_name: writer.first_name,
                last_name: writer.last_name,
            });
        }
        Ok(count)
    }

    async fn insert_books(&self, books: Vec<NewBook>) -> Result<u64> {
        let mut tables = self.tables.write().await;

        // All-or-nothing, like the transactional insert in PostgreSQL
        if let Some(missing) = books.iter().find(|b| tables.writer(b.writer_id).is_none()) {
            return Err(StoreError::MissingReference {
                table: "writers",
                id: missing.writer_id.as_i32(),
            });
        }

        let count = books.len() as u64;
        for book in books {
            let book_id = BookId::new(Tables::next_id(tables.books.len()));
            tables.books.push(Book {
                book_id,
                title: book.title,
                release_date: book.release_date,
                writer_id: book.writer_id,
            });
        }
        Ok(count)
    }

    async fn insert_readers(&self, readers: Vec<NewReader>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let count = readers.len() as u64;
        for reader in readers {
            let reader_id = ReaderId::new(Tables::next_id(tables.readers.len()));
            tables.readers.push(Reader {
                reader_id,
                first_name: reader.first_name,
                last_name: reader.last_name,
                phone_number: reader.phone_number,
                registration_date: reader.registration_date,
            });
        }
        Ok(count)
    }

    async fn writer_ids(&self) -> Result<Vec<WriterId>> {
        let tables = self.tables.read().await;
        Ok(tables.writers.iter().map(|w| w.writer_id).collect())
    }

    async fn table_counts(&self) -> Result<TableCounts> {
        let tables = self.tables.read().await;
        Ok(TableCounts {
            writers: tables.writers.len() as u64,
            books: tables.books.len() as u64,
            readers: tables.readers.len() as u64,
        })
    }

    async fn random_readers(&self, limit: usize) -> Result<Vec<Reader>> {
        let tables = self.tables.read().await;
        let mut rng = rand::thread_rng();
        Ok(tables
            .readers
            .choose_multiple(&mut rng, limit)
            .cloned()
            .collect())
    }

    async fn random_books(&self, limit: usize) -> Result<Vec<BookListing>> {
        let tables = self.tables.read().await;
        let mut rng = rand::thread_rng();
        Ok(tables
            .books
            .choose_multiple(&mut rng, limit)
            .filter_map(|book| {
                let writer = tables.writer(book.writer_id)?;
                Some(BookListing {
                    book_id: book.book_id,
                    title: book.title.clone(),
                    writer_first_name: writer.first_name.clone(),
                    writer_last_name: writer.last_name.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::LibraryStoreExt;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    async fn seeded_store() -> InMemoryLibraryStore {
        let store = InMemoryLibraryStore::new();
        store
            .insert_writers(vec![NewWriter {
                first_name: "Anna".to_string(),
                last_name: "Akhmatova".to_string(),
            }])
            .await
            .unwrap();
        store
            .insert_books(vec![
                NewBook {
                    title: "Requiem".to_string(),
                    release_date: date(),
                    writer_id: WriterId::new(1),
                },
                NewBook {
                    title: "Evening".to_string(),
                    release_date: date(),
                    writer_id: WriterId::new(1),
                },
            ])
            .await
            .unwrap();
        store
            .insert_readers(vec![NewReader {
                first_name: "Ivan".to_string(),
                last_name: "Petrov".to_string(),
                phone_number: "+7 (912) 345-67-89".to_string(),
                registration_date: date(),
            }])
            .await
            .unwrap();
        store
    }

    fn rating(reader: i32, book: i32, scale: i32) -> NewRatingEntry {
        NewRatingEntry {
            reader_id: ReaderId::new(reader),
            book_id: BookId::new(book),
            rating_id: RatingScaleId::new(scale),
        }
    }

    #[tokio::test]
    async fn new_store_has_full_scale() {
        let store = InMemoryLibraryStore::new();
        let scale = store.rating_scale().await.unwrap();
        assert_eq!(scale.len(), 5);
        for value in RatingValue::ALL {
            assert!(store.rating_scale_id(value).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn partial_scale_misses_values() {
        let store = InMemoryLibraryStore::with_rating_scale(&[RatingValue::MIN]);
        assert!(store.rating_scale_id(RatingValue::MAX).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let store = seeded_store().await;
        assert!(store.reader_exists(ReaderId::new(1)).await.unwrap());
        assert!(!store.reader_exists(ReaderId::new(2)).await.unwrap());
        assert!(store.book_exists(BookId::new(2)).await.unwrap());
        assert!(!store.book_exists(BookId::new(3)).await.unwrap());
        assert_eq!(store.writer_ids().await.unwrap(), vec![WriterId::new(1)]);
    }

    #[tokio::test]
    async fn insert_rating_assigns_id_and_timestamp() {
        let store = seeded_store().await;
        let before = Utc::now();
        let entry = store.insert_rating(rating(1, 1, 4)).await.unwrap();

        assert_eq!(entry.rating_entry_id, RatingEntryId::new(1));
        assert!(entry.rating_date >= before);
        assert!(store.rating_exists(ReaderId::new(1), BookId::new(1)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let store = seeded_store().await;
        store.insert_rating(rating(1, 1, 4)).await.unwrap();

        let result = store.insert_rating(rating(1, 1, 2)).await;
        assert!(matches!(result, Err(StoreError::DuplicateRating { .. })));
        assert_eq!(store.rating_count().await, 1);
    }

    #[tokio::test]
    async fn missing_reference_is_rejected() {
        let store = seeded_store().await;
        let result = store.insert_rating(rating(9, 1, 4)).await;
        assert!(matches!(
            result,
            Err(StoreError::MissingReference { table: "readers", id: 9 })
        ));
        assert_eq!(store.rating_count().await, 0);
    }

    #[tokio::test]
    async fn books_without_writer_are_not_inserted() {
        let store = seeded_store().await;
        let result = store
            .insert_books(vec![NewBook {
                title: "Orphan".to_string(),
                release_date: date(),
                writer_id: WriterId::new(99),
            }])
            .await;
        assert!(result.is_err());
        assert_eq!(store.table_counts().await.unwrap().books, 2);
    }

    #[tokio::test]
    async fn book_ratings_distinguishes_missing_and_unrated() {
        let store = seeded_store().await;
        assert!(store.book_ratings(BookId::new(99)).await.unwrap().is_none());

        let unrated = store.book_ratings(BookId::new(2)).await.unwrap().unwrap();
        assert_eq!(unrated.book.title, "Evening");
        assert!(unrated.values.is_empty());

        store.insert_rating(rating(1, 1, 3)).await.unwrap();
        let rated = store.book_ratings(BookId::new(1)).await.unwrap().unwrap();
        assert_eq!(rated.values, vec![RatingValue::new(3).unwrap()]);
    }

    #[tokio::test]
    async fn recent_ratings_are_newest_first_and_limited() {
        let store = seeded_store().await;
        store.insert_rating(rating(1, 1, 3)).await.unwrap();
        store.insert_rating(rating(1, 2, 5)).await.unwrap();

        let recent = store.recent_ratings(5).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].book_title, "Evening");
        assert_eq!(recent[0].rating_value, RatingValue::MAX);
        assert_eq!(recent[1].book_title, "Requiem");

        let limited = store.recent_ratings(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].book_id, BookId::new(2));
    }

    #[tokio::test]
    async fn counts_and_population_state() {
        let store = InMemoryLibraryStore::new();
        assert!(store.is_unpopulated().await.unwrap());

        let store = seeded_store().await;
        let counts = store.table_counts().await.unwrap();
        assert_eq!(
            counts,
            TableCounts {
                writers: 1,
                books: 2,
                readers: 1
            }
        );
        assert!(!store.is_unpopulated().await.unwrap());

        store.clear().await;
        assert!(store.is_unpopulated().await.unwrap());
    }

    #[tokio::test]
    async fn random_listings_are_bounded() {
        let store = seeded_store().await;
        assert_eq!(store.random_readers(20).await.unwrap().len(), 1);

        let books = store.random_books(1).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].writer_last_name, "Akhmatova");
    }
}
