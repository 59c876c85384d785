// API type definitions
// Request bodies accepted by the book operations and the response envelope

use serde::{Deserialize, Deserializer, Serialize};

use crate::store::{Book, NewBook};

/// Body of `POST /books`.
///
/// Every field is optional at the parsing stage; required fields are checked
/// by [`BookInput::validate`] so a missing title is a validation error rather
/// than a parse error. A client-supplied `id` is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub genre: Option<String>,
}

impl BookInput {
    /// Title and author must be present and non-empty
    pub fn validate(self) -> Option<NewBook> {
        match (self.title, self.author) {
            (Some(title), Some(author)) if has_required_fields(&title, &author) => Some(NewBook {
                title,
                author,
                year: self.year,
                genre: self.genre,
            }),
            _ => None,
        }
    }
}

/// Body of `PUT /books/{id}`: any subset of the book fields.
///
/// `year` and `genre` distinguish "absent" (keep) from explicit `null` (clear).
/// An `id` in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub genre: Option<Option<String>>,
}

impl BookPatch {
    /// Merge the supplied fields over `book`, leaving its identifier alone
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(year) = self.year {
            book.year = year;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
    }
}

/// Wraps a present field (even `null`) in `Some`, so absence stays `None`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn has_required_fields(title: &str, author: &str) -> bool {
    !title.is_empty() && !author.is_empty()
}

/// Response payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Book(Book),
    Books(Vec<Book>),
}

/// Uniform response body of every non-preflight response
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub const fn data(message: &'static str, data: Payload) -> Self {
        Self {
            message,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &'static str, error: impl Into<String>) -> Self {
        Self {
            message,
            data: None,
            error: Some(error.into()),
        }
    }
}
