//! Business logic services

pub mod book_instances;

use std::sync::Arc;

use crate::repository::Store;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub book_instances: book_instances::BookInstanceService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            book_instances: book_instances::BookInstanceService::new(store.clone()),
            store,
        }
    }
}
