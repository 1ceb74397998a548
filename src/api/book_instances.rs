//! Book instance (copy) pages

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::BookInstanceForm,
    services::book_instances::Submission,
    views::Page,
    AppState,
};

pub const LIST_PATH: &str = "/catalog/bookinstances";

fn render(state: &AppState, page: Page) -> AppResult<Html<String>> {
    Ok(Html(state.renderer.render(&page)?))
}

fn respond(state: &AppState, submission: Submission) -> AppResult<Response> {
    match submission {
        Submission::Saved(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        Submission::Invalid(form) => Ok(render(state, Page::BookInstanceForm(form))?.into_response()),
    }
}

/// List all book instances
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let instances = state.services.book_instances.list().await?;
    render(&state, Page::BookInstanceList { instances })
}

/// Detail page of one book instance
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let detail = state.services.book_instances.get_detail(&id).await?;
    render(&state, Page::BookInstanceDetail { detail })
}

/// Empty create form
pub async fn create_get(State(state): State<AppState>) -> AppResult<Html<String>> {
    let form = state.services.book_instances.create_form().await?;
    render(&state, Page::BookInstanceForm(form))
}

/// Handle create form submission
pub async fn create_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let submission = state.services.book_instances.create(form).await?;
    respond(&state, submission)
}

/// Delete confirmation page
pub async fn delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let instance = state.services.book_instances.get_for_delete(&id).await?;
    render(&state, Page::BookInstanceDelete { instance })
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub bookinstanceid: String,
}

/// Handle delete confirmation; the id comes from the form body
pub async fn delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Redirect> {
    state
        .services
        .book_instances
        .delete(&form.bookinstanceid)
        .await?;
    Ok(Redirect::to(LIST_PATH))
}

/// Update form filled with current values
pub async fn update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let form = state.services.book_instances.update_form(&id).await?;
    render(&state, Page::BookInstanceForm(form))
}

/// Handle update form submission
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let submission = state.services.book_instances.update(&id, form).await?;
    respond(&state, submission)
}
