//! Catalog server
//!
//! Server-rendered pages for managing the physical copies (book instances)
//! held by a local library: list, detail, create, update and delete.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod sanitize;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub renderer: Arc<dyn views::Renderer>,
}
