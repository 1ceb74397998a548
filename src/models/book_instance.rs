//! Book instance (physical copy) model, form input and validation

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::book::Book;
use crate::sanitize::{escape_html, parse_iso8601_date};

/// Availability of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl Default for BookInstanceStatus {
    fn default() -> Self {
        BookInstanceStatus::Maintenance
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown book instance status: {}", s))
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstance {
    pub id: Uuid,
    /// Referenced book
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        instance_url(self.id)
    }

    /// Medium date form, e.g. `Oct 18, 2026`; empty when not set
    pub fn due_back_formatted(&self) -> String {
        self.due_back
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }

    pub fn due_back_yyyy_mm_dd(&self) -> String {
        format_form_date(self.due_back)
    }
}

pub fn instance_url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

fn format_form_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Book instance with its book reference resolved.
/// `book` is `None` when the reference points to a missing book.
#[derive(Debug, Clone)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

/// Candidate entity built from sanitized form fields.
///
/// Keeps `book` and `status` as submitted so an invalid form can be
/// shown again with the user's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub id: Uuid,
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceDraft {
    pub fn due_back_yyyy_mm_dd(&self) -> String {
        format_form_date(self.due_back)
    }

    fn to_instance(&self) -> Option<BookInstance> {
        let status = if self.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            self.status.parse().ok()?
        };

        Some(BookInstance {
            id: self.id,
            book: Uuid::parse_str(&self.book).ok()?,
            imprint: self.imprint.clone(),
            status,
            due_back: self.due_back,
        })
    }
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: instance.id,
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance.due_back,
        }
    }
}

/// Field level validation failure shown next to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Submitted create/update form (urlencoded body)
#[derive(Debug, Default, Deserialize)]
pub struct BookInstanceForm {
    pub book: Option<String>,
    pub imprint: Option<String>,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

/// Outcome of validating a submitted form
#[derive(Debug)]
pub enum Validated {
    Valid(BookInstance),
    Invalid {
        draft: BookInstanceDraft,
        errors: Vec<FieldError>,
    },
}

/// Sanitized values checked by the validator derive
#[derive(Debug, Validate)]
struct CheckedFields {
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "validate_book_reference")
    )]
    book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    imprint: String,
    #[validate(custom(function = "validate_status"))]
    status: String,
    #[validate(custom(function = "validate_due_back"))]
    due_back: Option<String>,
}

/// Order in which field errors are reported
const FIELD_ORDER: [&str; 4] = ["book", "imprint", "status", "due_back"];

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_book_reference(book: &str) -> Result<(), ValidationError> {
    // Emptiness is reported by the length rule
    if book.is_empty() || Uuid::parse_str(book).is_ok() {
        Ok(())
    } else {
        Err(failure("book_reference", "Invalid book"))
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if status.is_empty() || status.parse::<BookInstanceStatus>().is_ok() {
        Ok(())
    } else {
        Err(failure("status", "Invalid status"))
    }
}

fn validate_due_back(due_back: &str) -> Result<(), ValidationError> {
    match parse_iso8601_date(due_back) {
        Some(_) => Ok(()),
        None => Err(failure("iso8601", "Invalid date")),
    }
}

fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| by_field.get(*field).map(|errs| (*field, errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field, message)
            })
        })
        .collect()
}

impl BookInstanceForm {
    /// Sanitize the submitted fields, build the candidate entity with the
    /// given identity and validate it.
    pub fn validate_into(self, id: Uuid) -> Validated {
        let checked = CheckedFields {
            book: escape_html(self.book.as_deref().unwrap_or_default().trim()),
            imprint: escape_html(self.imprint.as_deref().unwrap_or_default().trim()),
            status: escape_html(self.status.as_deref().unwrap_or_default()),
            due_back: self.due_back.filter(|d| !d.is_empty()),
        };

        let errors = match checked.validate() {
            Ok(()) => Vec::new(),
            Err(e) => collect_field_errors(&e),
        };

        let draft = BookInstanceDraft {
            id,
            due_back: checked.due_back.as_deref().and_then(parse_iso8601_date),
            book: checked.book,
            imprint: checked.imprint,
            status: checked.status,
        };

        match (errors.is_empty(), draft.to_instance()) {
            (true, Some(instance)) => Validated::Valid(instance),
            _ => Validated::Invalid { draft, errors },
        }
    }
}
