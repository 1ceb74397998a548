//! Built-in HTML renderer

use std::fmt::Write;

use super::{BookInstanceFormPage, Page, Renderer};
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceDetail, BookInstanceStatus},
    sanitize::escape_html,
};

#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page) -> AppResult<String> {
        let mut body = String::new();
        match page {
            Page::BookInstanceList { instances } => list(&mut body, instances)?,
            Page::BookInstanceDetail { detail } => detail_view(&mut body, detail)?,
            Page::BookInstanceForm(form) => form_view(&mut body, form)?,
            Page::BookInstanceDelete { instance } => delete_view(&mut body, instance)?,
        }
        layout(page.template(), &page.title(), &body)
    }
}

fn layout(view: &str, title: &str, content: &str) -> AppResult<String> {
    let mut out = String::new();
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body data-view=\"{view}\">\n\
         <nav><ul>\
         <li><a href=\"/catalog/bookinstances\">All book-instances</a></li>\
         <li><a href=\"/catalog/bookinstance/create\">Create new book instance (copy)</a></li>\
         </ul></nav>\n<main>\n<h1>{title}</h1>\n{content}</main>\n</body>\n</html>\n",
        view = view,
        title = escape_html(title),
        content = content,
    )?;
    Ok(out)
}

fn status_class(status: BookInstanceStatus) -> &'static str {
    match status {
        BookInstanceStatus::Available => "text-success",
        BookInstanceStatus::Maintenance => "text-danger",
        _ => "text-warning",
    }
}

fn book_title(detail: &BookInstanceDetail) -> String {
    detail
        .book
        .as_ref()
        .map(|b| escape_html(&b.title))
        .unwrap_or_default()
}

fn list(out: &mut String, instances: &[BookInstanceDetail]) -> AppResult<()> {
    if instances.is_empty() {
        out.push_str("<p>There are no book copies in this library.</p>\n");
        return Ok(());
    }

    out.push_str("<ul>\n");
    for detail in instances {
        let instance = &detail.instance;
        write!(
            out,
            "<li><a href=\"{}\">{} : {}</a> - <span class=\"{}\">{}</span>",
            instance.url(),
            book_title(detail),
            escape_html(&instance.imprint),
            status_class(instance.status),
            instance.status,
        )?;
        if instance.status != BookInstanceStatus::Available {
            write!(out, "<span> (Due: {})</span>", instance.due_back_formatted())?;
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    Ok(())
}

fn detail_view(out: &mut String, detail: &BookInstanceDetail) -> AppResult<()> {
    let instance = &detail.instance;
    write!(out, "<p>ID: {}</p>\n", instance.id)?;
    if let Some(book) = &detail.book {
        write!(
            out,
            "<p><strong>Title:</strong> <a href=\"{}\">{}</a></p>\n",
            book.url(),
            escape_html(&book.title)
        )?;
    }
    write!(
        out,
        "<p><strong>Imprint:</strong> {}</p>\n\
         <p><strong>Status:</strong> <span class=\"{}\">{}</span></p>\n",
        escape_html(&instance.imprint),
        status_class(instance.status),
        instance.status,
    )?;
    if instance.status != BookInstanceStatus::Available {
        write!(
            out,
            "<p><strong>Due back:</strong> {}</p>\n",
            instance.due_back_formatted()
        )?;
    }
    write!(
        out,
        "<hr>\n<p><a href=\"{url}/delete\">Delete BookInstance</a></p>\n\
         <p><a href=\"{url}/update\">Update BookInstance</a></p>\n",
        url = instance.url(),
    )?;
    Ok(())
}

fn form_view(out: &mut String, form: &BookInstanceFormPage) -> AppResult<()> {
    let selected = form.selected_book.as_deref().unwrap_or_default();

    out.push_str("<form method=\"POST\">\n<div>\n<label for=\"book\">Book:</label>\n");
    out.push_str("<select id=\"book\" name=\"book\" required>\n<option value=\"\">--Please select a book--</option>\n");
    for book in &form.books {
        let id = book.id.to_string();
        write!(
            out,
            "<option value=\"{}\"{}>{}</option>\n",
            id,
            if id == selected { " selected" } else { "" },
            escape_html(&book.title),
        )?;
    }
    out.push_str("</select>\n</div>\n");

    let (imprint, due_back, status) = form
        .instance
        .as_ref()
        .map(|d| (escape_html(&d.imprint), d.due_back_yyyy_mm_dd(), d.status.clone()))
        .unwrap_or_default();

    write!(
        out,
        "<div>\n<label for=\"imprint\">Imprint:</label>\n\
         <input id=\"imprint\" type=\"text\" name=\"imprint\" required value=\"{}\">\n</div>\n\
         <div>\n<label for=\"due_back\">Date when book available:</label>\n\
         <input id=\"due_back\" type=\"date\" name=\"due_back\" value=\"{}\">\n</div>\n",
        imprint, due_back,
    )?;

    out.push_str("<div>\n<label for=\"status\">Status:</label>\n<select id=\"status\" name=\"status\" required>\n<option value=\"\">--Please select a status--</option>\n");
    for choice in BookInstanceStatus::ALL {
        write!(
            out,
            "<option value=\"{0}\"{1}>{0}</option>\n",
            choice,
            if status == choice.as_str() { " selected" } else { "" },
        )?;
    }
    out.push_str("</select>\n</div>\n<button type=\"submit\">Submit</button>\n</form>\n");

    if !form.errors.is_empty() {
        out.push_str("<ul class=\"errors\">\n");
        for error in &form.errors {
            write!(
                out,
                "<li data-field=\"{}\">{}</li>\n",
                escape_html(&error.field),
                escape_html(&error.message)
            )?;
        }
        out.push_str("</ul>\n");
    }
    Ok(())
}

fn delete_view(out: &mut String, instance: &BookInstance) -> AppResult<()> {
    write!(
        out,
        "<p>ID: {id}</p>\n<p><strong>Imprint:</strong> {imprint}</p>\n\
         <p><strong>Status:</strong> <span class=\"{class}\">{status}</span></p>\n",
        id = instance.id,
        imprint = escape_html(&instance.imprint),
        class = status_class(instance.status),
        status = instance.status,
    )?;
    if instance.status != BookInstanceStatus::Available {
        write!(
            out,
            "<p><strong>Due back:</strong> {}</p>\n",
            instance.due_back_formatted()
        )?;
    }
    write!(
        out,
        "<p>Do you really want to delete this BookInstance?</p>\n\
         <form method=\"POST\">\n\
         <input id=\"bookinstanceid\" type=\"hidden\" name=\"bookinstanceid\" value=\"{}\">\n\
         <button type=\"submit\">Delete</button>\n</form>\n",
        instance.id,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookInstanceDraft, FieldError};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn detail(status: BookInstanceStatus) -> BookInstanceDetail {
        let book = Book::new("The <Hobbit>");
        BookInstanceDetail {
            instance: BookInstance {
                id: Uuid::new_v4(),
                book: book.id,
                imprint: "Allen &amp; Unwin".to_string(),
                status,
                due_back: NaiveDate::from_ymd_opt(2026, 12, 1),
            },
            book: Some(book),
        }
    }

    #[test]
    fn test_list_escapes_titles_and_shows_due_date() {
        let page = Page::BookInstanceList {
            instances: vec![detail(BookInstanceStatus::Loaned)],
        };
        let html = HtmlRenderer::new().render(&page).unwrap();

        assert!(html.contains("<title>Book Instance List</title>"));
        assert!(html.contains("<body data-view=\"bookinstance_list\">"));
        assert!(html.contains("The &lt;Hobbit&gt;"));
        assert!(html.contains("(Due: Dec 1, 2026)"));
        assert!(html.contains("text-warning"));
    }

    #[test]
    fn test_empty_list() {
        let page = Page::BookInstanceList { instances: vec![] };
        let html = HtmlRenderer::new().render(&page).unwrap();
        assert!(html.contains("There are no book copies in this library."));
    }

    #[test]
    fn test_detail_title_uses_book_title() {
        let page = Page::BookInstanceDetail {
            detail: detail(BookInstanceStatus::Available),
        };
        assert_eq!(page.title(), "Copy: The <Hobbit>");
        assert_eq!(page.template(), "bookinstance_detail");
        let html = HtmlRenderer::new().render(&page).unwrap();
        assert!(html.contains("<h1>Copy: The &lt;Hobbit&gt;</h1>"));
        assert!(!html.contains("Due back"));
    }

    #[test]
    fn test_form_reselects_book_and_status_and_lists_errors() {
        let book = Book::new("Dune");
        let draft = BookInstanceDraft {
            id: Uuid::new_v4(),
            book: book.id.to_string(),
            imprint: "Ace".to_string(),
            status: "Reserved".to_string(),
            due_back: None,
        };
        let page = Page::BookInstanceForm(BookInstanceFormPage {
            title: "Create BookInstance".to_string(),
            books: vec![book.clone()],
            selected_book: Some(book.id.to_string()),
            instance: Some(draft),
            errors: vec![FieldError::new("due_back", "Invalid date")],
        });
        let html = HtmlRenderer::new().render(&page).unwrap();

        assert!(html.contains(&format!("<option value=\"{}\" selected>Dune</option>", book.id)));
        assert!(html.contains("<option value=\"Reserved\" selected>Reserved</option>"));
        assert!(html.contains("<li data-field=\"due_back\">Invalid date</li>"));
        assert!(html.contains("value=\"Ace\""));
    }

    #[test]
    fn test_delete_page_posts_instance_id() {
        let detail = detail(BookInstanceStatus::Maintenance);
        let page = Page::BookInstanceDelete {
            instance: detail.instance.clone(),
        };
        let html = HtmlRenderer::new().render(&page).unwrap();
        assert!(html.contains(&format!(
            "name=\"bookinstanceid\" value=\"{}\"",
            detail.instance.id
        )));
    }
}
