//! PostgreSQL implementation of the catalog store

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::Store;
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail, BookInstanceStatus},
};

/// Row of `book_instances` joined with the referenced book title
#[derive(FromRow)]
struct BookInstanceRow {
    id: Uuid,
    book_id: Uuid,
    imprint: String,
    status: String,
    due_back: Option<NaiveDate>,
    #[sqlx(default)]
    book_title: Option<String>,
}

impl BookInstanceRow {
    fn into_instance(self) -> BookInstance {
        let status = self.status.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Book instance {} has unknown status {:?}, using default",
                self.id,
                self.status
            );
            BookInstanceStatus::default()
        });

        BookInstance {
            id: self.id,
            book: self.book_id,
            imprint: self.imprint,
            status,
            due_back: self.due_back,
        }
    }

    fn into_detail(mut self) -> BookInstanceDetail {
        let book = self.book_title.take().map(|title| Book {
            id: self.book_id,
            title,
        });
        BookInstanceDetail {
            instance: self.into_instance(),
            book,
        }
    }
}

const SELECT_DETAIL: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title AS book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_book_instances(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(&format!("{} ORDER BY bi.seq", SELECT_DETAIL))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookInstanceRow::into_detail).collect())
    }

    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BookInstanceRow::into_instance))
    }

    async fn find_book_instance_detail(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>> {
        let row = sqlx::query_as::<_, BookInstanceRow>(&format!("{} WHERE bi.id = $1", SELECT_DETAIL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookInstanceRow::into_detail))
    }

    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_instance())
    }

    async fn update_book_instance(&self, instance: &BookInstance) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.id)
        .bind(instance.book)
        .bind(&instance.imprint)
        .bind(instance.status.as_str())
        .bind(instance.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BookInstanceRow::into_instance))
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT id, title FROM books ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn insert_book(&self, book: &Book) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (id, title) VALUES ($1, $2) RETURNING id, title",
        )
        .bind(book.id)
        .bind(&book.title)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }
}
