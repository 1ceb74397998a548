//! In-memory catalog store, keeps insertion order

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail},
};

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<IndexMap<Uuid, Book>>,
    instances: RwLock<IndexMap<Uuid, BookInstance>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given books
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: RwLock::new(books.into_iter().map(|b| (b.id, b)).collect()),
            instances: RwLock::default(),
        }
    }

    async fn resolve(&self, instance: BookInstance) -> BookInstanceDetail {
        let book = self.books.read().await.get(&instance.book).cloned();
        BookInstanceDetail { instance, book }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_book_instances(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let books = self.books.read().await;
        let instances = self.instances.read().await;
        Ok(instances
            .values()
            .map(|instance| BookInstanceDetail {
                instance: instance.clone(),
                book: books.get(&instance.book).cloned(),
            })
            .collect())
    }

    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.instances.read().await.get(&id).cloned())
    }

    async fn find_book_instance_detail(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>> {
        let found = self.instances.read().await.get(&id).cloned();
        match found {
            Some(instance) => Ok(Some(self.resolve(instance).await)),
            None => Ok(None),
        }
    }

    async fn insert_book_instance(&self, instance: &BookInstance) -> AppResult<BookInstance> {
        self.instances
            .write()
            .await
            .insert(instance.id, instance.clone());
        Ok(instance.clone())
    }

    async fn update_book_instance(&self, instance: &BookInstance) -> AppResult<Option<BookInstance>> {
        let mut instances = self.instances.write().await;
        Ok(instances.get_mut(&instance.id).map(|existing| {
            *existing = instance.clone();
            existing.clone()
        }))
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.instances.write().await.shift_remove(&id).is_some())
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn insert_book(&self, book: &Book) -> AppResult<Book> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(book.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookInstanceStatus;

    fn instance(book: Uuid, imprint: &str) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book,
            imprint: imprint.to_string(),
            status: BookInstanceStatus::Available,
            due_back: None,
        }
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let book = Book::new("Dune");
        let store = MemoryStore::with_books([book.clone()]);
        for imprint in ["Ace", "Chilton", "Gollancz"] {
            store.insert_book_instance(&instance(book.id, imprint)).await.unwrap();
        }

        let listed = store.list_book_instances().await.unwrap();
        let imprints: Vec<_> = listed.iter().map(|d| d.instance.imprint.as_str()).collect();
        assert_eq!(imprints, ["Ace", "Chilton", "Gollancz"]);
        assert!(listed.iter().all(|d| d.book.as_ref() == Some(&book)));
    }

    #[tokio::test]
    async fn test_dangling_reference_resolves_to_none() {
        let store = MemoryStore::new();
        let saved = store
            .insert_book_instance(&instance(Uuid::new_v4(), "Ace"))
            .await
            .unwrap();

        let detail = store.find_book_instance_detail(saved.id).await.unwrap().unwrap();
        assert!(detail.book.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MemoryStore::new();
        let missing = instance(Uuid::new_v4(), "Ace");

        assert!(store.update_book_instance(&missing).await.unwrap().is_none());
        assert!(!store.delete_book_instance(missing.id).await.unwrap());
    }
}
