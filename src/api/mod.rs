// API module entry
// Book CRUD handler for gateway proxy events

mod error;
mod event;
mod handlers;
mod response;
mod types;


use std::sync::Arc;

use error::HandlerResult;

use crate::logger;
use crate::routing::{self, Operation};
use crate::store::BookRepository;

// Re-export public types
pub use event::{ApiGatewayEvent, ApiGatewayResponse};
pub use response::{invalid_body, payload_too_large};

/// Behaviour switches of the book handler
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
    /// Re-check title/author after an update merge
    pub validate_updates: bool,
}

/// Book API request handler.
///
/// The store is injected at construction, so every instance (and every test)
/// can own an isolated one.
pub struct BookApi<R: BookRepository> {
    store: Arc<R>,
    options: ApiOptions,
}

impl<R: BookRepository> BookApi<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self::with_options(store, ApiOptions::default())
    }

    pub const fn with_options(store: Arc<R>, options: ApiOptions) -> Self {
        Self { store, options }
    }

    pub const fn store(&self) -> &Arc<R> {
        &self.store
    }

    /// Route an event to its operation and produce the gateway response.
    ///
    /// Never fails: operation errors become the generic 500 envelope and
    /// their detail only reaches the error log.
    pub fn handle(&self, event: &ApiGatewayEvent) -> ApiGatewayResponse {
        logger::log_debug(&format!(
            "Book API Handler called: {} {}",
            event.http_method, event.path
        ));

        let Some(operation) = routing::match_route(&event.http_method, &event.path) else {
            return response::route_not_found();
        };

        match self.dispatch(operation, event) {
            Ok(response) => response,
            Err(e) => {
                logger::log_error(&format!("Error in book API handler: {e}"));
                response::internal_error()
            }
        }
    }

    /// Handle a raw JSON gateway event and return the JSON-encoded response
    pub fn handle_json(&self, raw_event: &str) -> String {
        let response = match serde_json::from_str::<ApiGatewayEvent>(raw_event) {
            Ok(event) => self.handle(&event),
            Err(e) => {
                logger::log_warning(&format!("Undecodable gateway event: {e}"));
                response::invalid_body()
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to serialize gateway response: {e}"));
            r#"{"statusCode":500,"headers":{},"body":""}"#.to_string()
        })
    }

    fn dispatch(
        &self,
        operation: Operation,
        event: &ApiGatewayEvent,
    ) -> HandlerResult<ApiGatewayResponse> {
        let store = self.store.as_ref();
        let id = event.path_id();
        let body = event.body.as_deref();

        match operation {
            Operation::ListBooks => handlers::list_books(store),
            Operation::GetBook => handlers::get_book(store, id),
            Operation::CreateBook => handlers::create_book(store, body),
            Operation::UpdateBook => {
                handlers::update_book(store, id, body, self.options.validate_updates)
            }
            Operation::DeleteBook => handlers::delete_book(store, id),
            Operation::Preflight => Ok(response::preflight()),
        }
    }
}
