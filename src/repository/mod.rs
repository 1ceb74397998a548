//! Repository layer for catalog persistence

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Document operations the handlers need.
///
/// Every call is attempted exactly once; failures are returned as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// All book instances with their book resolved, in insertion order
    async fn list_book_instances(&self) -> AppResult<Vec<BookInstanceDetail>>;

    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>>;

    /// Find one book instance with its book resolved
    async fn find_book_instance_detail(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>>;

    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<BookInstance>;

    /// Replace book, imprint, status and due date of an existing instance.
    /// Returns `None` when no instance has this id.
    async fn update_book_instance(&self, instance: &BookInstance) -> AppResult<Option<BookInstance>>;

    /// Returns whether a record was removed
    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool>;

    /// Id and title of every book
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn insert_book(&self, book: &Book) -> AppResult<Book>;
}
