//! Book instance workflow: lookups, form validation and persistence

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        BookInstance, BookInstanceDetail, BookInstanceDraft, BookInstanceForm, FieldError,
        Validated,
    },
    repository::Store,
    views::BookInstanceFormPage,
};

const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update BookInstance";

/// Result of a create or update submission
#[derive(Debug)]
pub enum Submission {
    /// Persisted, redirect to the instance
    Saved(BookInstance),
    /// Validation failed, show the form again
    Invalid(BookInstanceFormPage),
}

fn not_found() -> AppError {
    AppError::NotFound("Book copy not found".to_string())
}

/// Path ids that do not parse cannot match any record
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}

#[derive(Clone)]
pub struct BookInstanceService {
    store: Arc<dyn Store>,
}

impl BookInstanceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All copies with their book, in storage order
    pub async fn list(&self) -> AppResult<Vec<BookInstanceDetail>> {
        self.store.list_book_instances().await
    }

    /// One copy with its book; a missing copy or book is not found
    pub async fn get_detail(&self, id: &str) -> AppResult<BookInstanceDetail> {
        let id = parse_id(id).ok_or_else(not_found)?;
        match self.store.find_book_instance_detail(id).await? {
            Some(detail) if detail.book.is_some() => Ok(detail),
            Some(_) => {
                tracing::warn!("Book instance {} references a missing book", id);
                Err(not_found())
            }
            None => Err(not_found()),
        }
    }

    /// Empty create form
    pub async fn create_form(&self) -> AppResult<BookInstanceFormPage> {
        Ok(BookInstanceFormPage {
            title: CREATE_TITLE.to_string(),
            books: self.store.list_books().await?,
            instance: None,
            selected_book: None,
            errors: Vec::new(),
        })
    }

    pub async fn create(&self, form: BookInstanceForm) -> AppResult<Submission> {
        match self.check_form(CREATE_TITLE, form, Uuid::new_v4()).await? {
            Ok(instance) => {
                let created = self.store.insert_book_instance(&instance).await?;
                tracing::info!("Created book instance {} of book {}", created.id, created.book);
                Ok(Submission::Saved(created))
            }
            Err(page) => {
                tracing::debug!("Rejected book instance form: {:?}", page.errors);
                Ok(Submission::Invalid(page))
            }
        }
    }

    /// Copy to confirm deletion of
    pub async fn get_for_delete(&self, id: &str) -> AppResult<BookInstance> {
        let id = parse_id(id).ok_or_else(not_found)?;
        self.store.find_book_instance(id).await?.ok_or_else(not_found)
    }

    /// Delete by id. Unknown ids are a no-op.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let Some(id) = parse_id(id) else {
            tracing::debug!("Ignoring delete of malformed book instance id {:?}", id);
            return Ok(());
        };

        if self.store.find_book_instance(id).await?.is_none() {
            tracing::debug!("Book instance {} already absent", id);
        }

        if self.store.delete_book_instance(id).await? {
            tracing::info!("Deleted book instance {}", id);
        }
        Ok(())
    }

    /// Update form filled with the stored copy
    pub async fn update_form(&self, id: &str) -> AppResult<BookInstanceFormPage> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let (detail, books) = tokio::try_join!(
            self.store.find_book_instance_detail(id),
            self.store.list_books(),
        )?;
        let detail = detail.ok_or_else(not_found)?;

        Ok(BookInstanceFormPage {
            title: UPDATE_TITLE.to_string(),
            books,
            selected_book: Some(detail.instance.book.to_string()),
            instance: Some(BookInstanceDraft::from(&detail.instance)),
            errors: Vec::new(),
        })
    }

    pub async fn update(&self, id: &str, form: BookInstanceForm) -> AppResult<Submission> {
        let id = parse_id(id).ok_or_else(not_found)?;
        match self.check_form(UPDATE_TITLE, form, id).await? {
            Ok(instance) => {
                let updated = self
                    .store
                    .update_book_instance(&instance)
                    .await?
                    .ok_or_else(not_found)?;
                tracing::info!("Updated book instance {}", updated.id);
                Ok(Submission::Saved(updated))
            }
            Err(page) => {
                tracing::debug!("Rejected book instance form for {}: {:?}", id, page.errors);
                Ok(Submission::Invalid(page))
            }
        }
    }

    /// Validate a submission and make sure its book exists.
    /// On failure the form page to show again is returned instead.
    async fn check_form(
        &self,
        title: &str,
        form: BookInstanceForm,
        id: Uuid,
    ) -> AppResult<Result<BookInstance, BookInstanceFormPage>> {
        let books = self.store.list_books().await?;
        let (draft, errors) = match form.validate_into(id) {
            Validated::Valid(instance) if books.iter().any(|b| b.id == instance.book) => {
                return Ok(Ok(instance));
            }
            Validated::Valid(instance) => (
                BookInstanceDraft::from(&instance),
                vec![FieldError::new("book", "Invalid book")],
            ),
            Validated::Invalid { draft, errors } => (draft, errors),
        };

        Ok(Err(BookInstanceFormPage {
            title: title.to_string(),
            books,
            selected_book: Some(draft.book.clone()),
            instance: Some(draft),
            errors,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Book, BookInstanceStatus},
        repository::{MemoryStore, MockStore},
    };

    fn form(book: &str, imprint: &str) -> BookInstanceForm {
        BookInstanceForm {
            book: Some(book.to_string()),
            imprint: Some(imprint.to_string()),
            status: Some("Available".to_string()),
            due_back: Some(String::new()),
        }
    }

    fn service_with_book() -> (BookInstanceService, Arc<MemoryStore>, Book) {
        let book = Book::new("Dune");
        let store = Arc::new(MemoryStore::with_books([book.clone()]));
        (BookInstanceService::new(store.clone()), store, book)
    }

    #[tokio::test]
    async fn test_create_persists_valid_form() {
        let (service, store, book) = service_with_book();

        let saved = match service.create(form(&book.id.to_string(), "Ace")).await.unwrap() {
            Submission::Saved(instance) => instance,
            Submission::Invalid(page) => panic!("unexpected errors: {:?}", page.errors),
        };

        let stored = store.find_book_instance(saved.id).await.unwrap().unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored.status, BookInstanceStatus::Available);
        assert_eq!(stored.due_back, None);
    }

    #[tokio::test]
    async fn test_create_invalid_refills_form_without_persisting() {
        let (service, store, book) = service_with_book();

        let page = match service.create(form(&book.id.to_string(), "  ")).await.unwrap() {
            Submission::Invalid(page) => page,
            Submission::Saved(instance) => panic!("unexpectedly saved {:?}", instance),
        };

        assert_eq!(page.title, CREATE_TITLE);
        assert_eq!(page.books, vec![book.clone()]);
        assert_eq!(page.selected_book, Some(book.id.to_string()));
        assert_eq!(page.errors.len(), 1);
        assert_eq!(page.errors[0].field, "imprint");
        assert!(store.list_book_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detail_unknown_or_malformed_id_is_not_found() {
        let (service, _, _) = service_with_book();

        let missing = service.get_detail(&Uuid::new_v4().to_string()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let malformed = service.get_detail("not-an-id").await;
        assert!(matches!(malformed, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_with_missing_book_is_not_found() {
        let (service, store, _) = service_with_book();
        let orphan = BookInstance {
            id: Uuid::new_v4(),
            book: Uuid::new_v4(),
            imprint: "Ace".to_string(),
            status: BookInstanceStatus::Available,
            due_back: None,
        };
        store.insert_book_instance(&orphan).await.unwrap();

        let result = service.get_detail(&orphan.id.to_string()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (service, store, book) = service_with_book();
        let Submission::Saved(created) = service.create(form(&book.id.to_string(), "Ace")).await.unwrap() else {
            panic!("create failed");
        };

        let mut changes = form(&book.id.to_string(), "Chilton");
        changes.status = Some("Loaned".to_string());
        changes.due_back = Some("2026-12-24".to_string());

        let Submission::Saved(updated) = service.update(&created.id.to_string(), changes).await.unwrap() else {
            panic!("update failed");
        };

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.imprint, "Chilton");
        assert_eq!(updated.status, BookInstanceStatus::Loaned);
        assert_eq!(store.list_book_instances().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_book_is_a_field_error() {
        let (service, store, _) = service_with_book();

        let page = match service.create(form(&Uuid::new_v4().to_string(), "Ace")).await.unwrap() {
            Submission::Invalid(page) => page,
            Submission::Saved(instance) => panic!("unexpectedly saved {:?}", instance),
        };

        assert_eq!(page.errors, vec![FieldError::new("book", "Invalid book")]);
        assert_eq!(page.instance.map(|d| d.imprint), Some("Ace".to_string()));
        assert!(store.list_book_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_to_unknown_book_keeps_stored_copy() {
        let (service, store, book) = service_with_book();
        let Submission::Saved(created) = service.create(form(&book.id.to_string(), "Ace")).await.unwrap() else {
            panic!("create failed");
        };

        let outcome = service
            .update(&created.id.to_string(), form(&Uuid::new_v4().to_string(), "Chilton"))
            .await
            .unwrap();

        assert!(matches!(outcome, Submission::Invalid(ref page) if page.title == UPDATE_TITLE));
        let stored = store.find_book_instance(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_missing_target_is_not_found() {
        let (service, _, book) = service_with_book();
        let result = service
            .update(&Uuid::new_v4().to_string(), form(&book.id.to_string(), "Ace"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, _, _) = service_with_book();
        service.delete(&Uuid::new_v4().to_string()).await.unwrap();
        service.delete("garbage").await.unwrap();
    }

    #[tokio::test]
    async fn test_store_errors_are_forwarded() {
        let mut store = MockStore::new();
        store
            .expect_list_book_instances()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let service = BookInstanceService::new(Arc::new(store));

        let result = service.list().await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_update_form_short_circuits_on_book_list_failure() {
        let id = Uuid::new_v4();
        let mut store = MockStore::new();
        store
            .expect_find_book_instance_detail()
            .returning(|_| Ok(None));
        store
            .expect_list_books()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let service = BookInstanceService::new(Arc::new(store));

        let result = service.update_form(&id.to_string()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_create_does_not_touch_instances() {
        let mut store = MockStore::new();
        store.expect_list_books().times(1).returning(|| Ok(vec![]));
        store.expect_insert_book_instance().never();
        let service = BookInstanceService::new(Arc::new(store));

        let outcome = service.create(BookInstanceForm::default()).await.unwrap();
        assert!(matches!(outcome, Submission::Invalid(ref page) if page.errors.len() == 2));
    }
}
