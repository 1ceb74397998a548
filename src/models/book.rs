//! Book model (referenced collection)

use sqlx::FromRow;
use uuid::Uuid;

/// Book title projection, enough to fill a selection list or a link
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}
