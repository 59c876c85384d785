//! Book CRUD handler for API-gateway proxy events.
//!
//! [`api::BookApi`] turns a gateway event into a gateway response against an
//! injected [`store::BookRepository`]. The `server` module is a local HTTP
//! front end that feeds real requests through the same handler.

pub mod api;
pub mod config;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
