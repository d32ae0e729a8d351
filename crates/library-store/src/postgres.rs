use async_trait::async_trait;
use common::{BookId, RatingEntryId, RatingScaleId, RatingValue, ReaderId, WriterId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result, StoreError,
    model::{
        Book, BookListing, BookRatings, NewBook, NewRatingEntry, NewReader, NewWriter,
        RatingEntry, RatingScale, RatingSummary, Reader, TableCounts,
    },
    store::LibraryStore,
};

/// Name of the unique constraint on `book_ratings (reader_id, book_id)`.
const UNIQUE_READER_BOOK: &str = "unique_reader_book";

/// PostgreSQL-backed library store implementation.
#[derive(Clone)]
pub struct PostgresLibraryStore {
    pool: PgPool,
}

impl PostgresLibraryStore {
    /// Creates a new PostgreSQL library store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::debug!("migrations applied");
        Ok(())
    }

    /// Closes every connection of the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_reader(row: PgRow) -> Result<Reader> {
        Ok(Reader {
            reader_id: ReaderId::new(row.try_get("reader_id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            phone_number: row.try_get("phone_number")?,
            registration_date: row.try_get("registration_date")?,
        })
    }

    fn row_to_summary(row: PgRow) -> Result<RatingSummary> {
        Ok(RatingSummary {
            rating_entry_id: RatingEntryId::new(row.try_get("rating_entry_id")?),
            reader_id: ReaderId::new(row.try_get("reader_id")?),
            reader_first_name: row.try_get("first_name")?,
            reader_last_name: row.try_get("last_name")?,
            book_id: BookId::new(row.try_get("book_id")?),
            book_title: row.try_get("title")?,
            rating_value: RatingValue::try_from(row.try_get::<i32, _>("rating_value")?)?,
            rating_date: row.try_get("rating_date")?,
        })
    }

    fn row_to_listing(row: PgRow) -> Result<BookListing> {
        Ok(BookListing {
            book_id: BookId::new(row.try_get("book_id")?),
            title: row.try_get("title")?,
            writer_first_name: row.try_get("first_name")?,
            writer_last_name: row.try_get("last_name")?,
        })
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl LibraryStore for PostgresLibraryStore {
    async fn reader_exists(&self, reader_id: ReaderId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM readers WHERE reader_id = $1)")
                .bind(reader_id.as_i32())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn book_exists(&self, book_id: BookId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE book_id = $1)")
                .bind(book_id.as_i32())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn rating_exists(&self, reader_id: ReaderId, book_id: BookId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM book_ratings WHERE reader_id = $1 AND book_id = $2)",
        )
        .bind(reader_id.as_i32())
        .bind(book_id.as_i32())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn rating_scale_id(&self, value: RatingValue) -> Result<Option<RatingScaleId>> {
        let rating_id: Option<i32> =
            sqlx::query_scalar("SELECT rating_id FROM ratings WHERE rating_value = $1")
                .bind(i32::from(value))
                .fetch_optional(&self.pool)
                .await?;
        Ok(rating_id.map(RatingScaleId::new))
    }

    async fn rating_scale(&self) -> Result<Vec<RatingScale>> {
        let rows = sqlx::query("SELECT rating_id, rating_value FROM ratings ORDER BY rating_value")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(RatingScale {
                    rating_id: RatingScaleId::new(row.try_get("rating_id")?),
                    rating_value: RatingValue::try_from(row.try_get::<i32, _>("rating_value")?)?,
                })
            })
            .collect()
    }

    async fn insert_rating(&self, entry: NewRatingEntry) -> Result<RatingEntry> {
        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO book_ratings (reader_id, book_id, rating_id)
            VALUES ($1, $2, $3)
            RETURNING rating_entry_id, rating_date
            "#,
        )
        .bind(entry.reader_id.as_i32())
        .bind(entry.book_id.as_i32())
        .bind(entry.rating_id.as_i32())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some(UNIQUE_READER_BOOK)
            {
                return StoreError::DuplicateRating {
                    reader_id: entry.reader_id,
                    book_id: entry.book_id,
                };
            }
            StoreError::Database(e)
        })?;

        let stored = RatingEntry {
            rating_entry_id: RatingEntryId::new(row.try_get("rating_entry_id")?),
            reader_id: entry.reader_id,
            book_id: entry.book_id,
            rating_id: entry.rating_id,
            rating_date: row.try_get("rating_date")?,
        };

        tx.commit().await?;
        tracing::debug!(rating_entry_id = %stored.rating_entry_id, "rating committed");
        Ok(stored)
    }

    async fn book_ratings(&self, book_id: BookId) -> Result<Option<BookRatings>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, b.release_date, b.writer_id, r.rating_value
            FROM books b
            LEFT JOIN book_ratings br ON b.book_id = br.book_id
            LEFT JOIN ratings r ON br.rating_id = r.rating_id
            WHERE b.book_id = $1
            "#,
        )
        .bind(book_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let book = Book {
            book_id: BookId::new(first.try_get("book_id")?),
            title: first.try_get("title")?,
            release_date: first.try_get("release_date")?,
            writer_id: WriterId::new(first.try_get("writer_id")?),
        };

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            // NULL when the left join found no rating
            if let Some(value) = row.try_get::<Option<i32>, _>("rating_value")? {
                values.push(RatingValue::try_from(value)?);
            }
        }

        Ok(Some(BookRatings { book, values }))
    }

    async fn recent_ratings(&self, limit: usize) -> Result<Vec<RatingSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT br.rating_entry_id, br.reader_id, r.first_name, r.last_name,
                   br.book_id, b.title, rat.rating_value, br.rating_date
            FROM book_ratings br
            JOIN readers r ON br.reader_id = r.reader_id
            JOIN books b ON br.book_id = b.book_id
            JOIN ratings rat ON br.rating_id = rat.rating_id
            ORDER BY br.rating_date DESC, br.rating_entry_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_summary).collect()
    }

    async fn insert_writers(&self, writers: Vec<NewWriter>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for writer in &writers {
            inserted += sqlx::query("INSERT INTO writers (first_name, last_name) VALUES ($1, $2)")
                .bind(&writer.first_name)
                .bind(&writer.last_name)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_books(&self, books: Vec<NewBook>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for book in &books {
            inserted += sqlx::query(
                "INSERT INTO books (title, release_date, writer_id) VALUES ($1, $2, $3)",
            )
            .bind(&book.title)
            .bind(book.release_date)
            .bind(book.writer_id.as_i32())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_readers(&self, readers: Vec<NewReader>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for reader in &readers {
            inserted += sqlx::query(
                r#"
                INSERT INTO readers (first_name, last_name, phone_number, registration_date)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&reader.first_name)
            .bind(&reader.last_name)
            .bind(&reader.phone_number)
            .bind(reader.registration_date)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn writer_ids(&self) -> Result<Vec<WriterId>> {
        let ids: Vec<i32> = sqlx::query_scalar("SELECT writer_id FROM writers ORDER BY writer_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(WriterId::new).collect())
    }

    async fn table_counts(&self) -> Result<TableCounts> {
        let row = sqlx::query(
            r#"
            SELECT (SELECT COUNT(*) FROM writers) AS writers,
                   (SELECT COUNT(*) FROM books) AS books,
                   (SELECT COUNT(*) FROM readers) AS readers
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let count = |column: &str| -> Result<u64> {
            let n: i64 = row.try_get(column)?;
            Ok(u64::try_from(n).unwrap_or_default())
        };

        Ok(TableCounts {
            writers: count("writers")?,
            books: count("books")?,
            readers: count("readers")?,
        })
    }

    async fn random_readers(&self, limit: usize) -> Result<Vec<Reader>> {
        let rows = sqlx::query(
            r#"
            SELECT reader_id, first_name, last_name, phone_number, registration_date
            FROM readers
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_reader).collect()
    }

    async fn random_books(&self, limit: usize) -> Result<Vec<BookListing>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, w.first_name, w.last_name
            FROM books b
            JOIN writers w ON b.writer_id = w.writer_id
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_listing).collect()
    }
}
