//! Page rendering

pub mod html;

use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDetail, BookInstanceDraft, FieldError},
};

pub use html::HtmlRenderer;

/// Data behind the create/update form
#[derive(Debug, Clone)]
pub struct BookInstanceFormPage {
    pub title: String,
    pub books: Vec<Book>,
    pub instance: Option<BookInstanceDraft>,
    pub selected_book: Option<String>,
    pub errors: Vec<FieldError>,
}

/// A named view and the data it needs
#[derive(Debug, Clone)]
pub enum Page {
    BookInstanceList { instances: Vec<BookInstanceDetail> },
    BookInstanceDetail { detail: BookInstanceDetail },
    BookInstanceForm(BookInstanceFormPage),
    BookInstanceDelete { instance: BookInstance },
}

impl Page {
    /// View name
    pub fn template(&self) -> &'static str {
        match self {
            Page::BookInstanceList { .. } => "bookinstance_list",
            Page::BookInstanceDetail { .. } => "bookinstance_detail",
            Page::BookInstanceForm(_) => "bookinstance_form",
            Page::BookInstanceDelete { .. } => "bookinstance_delete",
        }
    }

    pub fn title(&self) -> String {
        match self {
            Page::BookInstanceList { .. } => "Book Instance List".to_string(),
            Page::BookInstanceDetail { detail } => format!(
                "Copy: {}",
                detail.book.as_ref().map(|b| b.title.as_str()).unwrap_or_default()
            ),
            Page::BookInstanceForm(form) => form.title.clone(),
            Page::BookInstanceDelete { .. } => "Delete BookInstance".to_string(),
        }
    }
}

/// Produces the response body for a page
pub trait Renderer: Send + Sync {
    fn render(&self, page: &Page) -> AppResult<String>;
}
