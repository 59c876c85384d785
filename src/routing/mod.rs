//! Routing module
//!
//! Maps a request method and path onto one of the book API operations.

mod matcher;

pub use matcher::{match_route, Operation};
