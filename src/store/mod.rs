//! Book storage module
//!
//! The request handler only talks to storage through [`BookRepository`], so the
//! in-memory backend can be swapped for a persistent one without touching routing.

mod error;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBookStore;

use serde::{Deserialize, Serialize};

/// A stored book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the store on insert, never changed afterwards
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: Option<i64>,
    pub genre: Option<String>,
}

/// A validated book that has not been assigned an identifier yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: Option<i64>,
    pub genre: Option<String>,
}

impl NewBook {
    fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
        }
    }
}

/// Storage interface for book records.
///
/// Every call is atomic on its own. Callers that read and then write (update)
/// get no isolation between the two calls.
pub trait BookRepository: Send + Sync + 'static {
    /// All books in insertion order.
    fn list(&self) -> StoreResult<Vec<Book>>;

    /// Exact identifier lookup.
    fn get(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Assigns the next identifier and appends the book.
    fn insert(&self, book: NewBook) -> StoreResult<Book>;

    /// Replaces the book with the same identifier in place.
    /// Returns `false` when no such book exists.
    fn replace(&self, book: Book) -> StoreResult<bool>;

    /// Removes and returns the book with the given identifier.
    fn remove(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Number of stored books.
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }
}

/// The two books every seeded store starts with
pub fn seed_books() -> Vec<Book> {
    vec![
        Book {
            id: "1".to_string(),
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            year: Some(1925),
            genre: Some("Fiction".to_string()),
        },
        Book {
            id: "2".to_string(),
            title: "To Kill a Mockingbird".to_string(),
            author: "Harper Lee".to_string(),
            year: Some(1960),
            genre: Some("Fiction".to_string()),
        },
    ]
}
