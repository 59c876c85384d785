// Application state module
// Shared by every connection task

use super::types::Config;
use crate::api::{ApiOptions, BookApi};
use crate::store::MemoryBookStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub api: BookApi<MemoryBookStore>,
}

impl AppState {
    /// Build the handler with a fresh in-memory store as configured
    pub fn new(config: Config) -> Self {
        let store = MemoryBookStore::new_shared(config.books.seed);
        let api = BookApi::with_options(
            store,
            ApiOptions {
                validate_updates: config.books.validate_updates,
            },
        );
        Self { config, api }
    }
}
