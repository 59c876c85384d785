// Book operation handlers

use hyper::StatusCode;
use serde_json::Value;

use super::error::HandlerResult;
use super::event::ApiGatewayResponse;
use super::response::{book_not_found, invalid_body, json_response, validation_error};
use super::types::{has_required_fields, BookInput, BookPatch, Envelope, Payload};
use crate::logger;
use crate::store::BookRepository;

/// GET /books
pub fn list_books<R: BookRepository + ?Sized>(store: &R) -> HandlerResult<ApiGatewayResponse> {
    logger::log_info("Getting all books");
    let books = store.list()?;
    json_response(
        StatusCode::OK,
        &Envelope::data("Books retrieved successfully", Payload::Books(books)),
    )
}

/// GET /books/{id}
pub fn get_book<R: BookRepository + ?Sized>(
    store: &R,
    id: Option<&str>,
) -> HandlerResult<ApiGatewayResponse> {
    logger::log_info(&format!("Getting book with ID: {}", id.unwrap_or("-")));

    let Some(book) = lookup(store, id)? else {
        return Ok(book_not_found(id));
    };

    json_response(
        StatusCode::OK,
        &Envelope::data("Book retrieved successfully", Payload::Book(book)),
    )
}

/// POST /books
pub fn create_book<R: BookRepository + ?Sized>(
    store: &R,
    body: Option<&str>,
) -> HandlerResult<ApiGatewayResponse> {
    logger::log_info("Creating new book");

    let input: BookInput = match parse_body(body) {
        Ok(input) => input,
        Err(e) => {
            logger::log_warning(&format!("Error creating book: {e}"));
            return Ok(invalid_body());
        }
    };

    let Some(new_book) = input.validate() else {
        return Ok(validation_error());
    };

    let book = store.insert(new_book)?;
    logger::log_debug(&format!("Created book with ID: {}", book.id));

    json_response(
        StatusCode::CREATED,
        &Envelope::data("Book created successfully", Payload::Book(book)),
    )
}

/// PUT /books/{id}
///
/// With `validate` set, a merge that leaves title or author empty is rejected
/// and the stored book is left untouched.
pub fn update_book<R: BookRepository + ?Sized>(
    store: &R,
    id: Option<&str>,
    body: Option<&str>,
    validate: bool,
) -> HandlerResult<ApiGatewayResponse> {
    logger::log_info(&format!("Updating book with ID: {}", id.unwrap_or("-")));

    let patch: BookPatch = match parse_body(body) {
        Ok(patch) => patch,
        Err(e) => {
            logger::log_warning(&format!("Error updating book: {e}"));
            return Ok(invalid_body());
        }
    };

    let Some(mut book) = lookup(store, id)? else {
        return Ok(book_not_found(id));
    };

    patch.apply(&mut book);

    if validate && !has_required_fields(&book.title, &book.author) {
        return Ok(validation_error());
    }

    // Deleted between lookup and replace
    if !store.replace(book.clone())? {
        return Ok(book_not_found(id));
    }

    json_response(
        StatusCode::OK,
        &Envelope::data("Book updated successfully", Payload::Book(book)),
    )
}

/// DELETE /books/{id}
pub fn delete_book<R: BookRepository + ?Sized>(
    store: &R,
    id: Option<&str>,
) -> HandlerResult<ApiGatewayResponse> {
    logger::log_info(&format!("Deleting book with ID: {}", id.unwrap_or("-")));

    let removed = match id {
        Some(id) => store.remove(id)?,
        None => None,
    };
    let Some(book) = removed else {
        return Ok(book_not_found(id));
    };

    json_response(
        StatusCode::OK,
        &Envelope::data("Book deleted successfully", Payload::Book(book)),
    )
}

fn lookup<R: BookRepository + ?Sized>(
    store: &R,
    id: Option<&str>,
) -> HandlerResult<Option<crate::store::Book>> {
    match id {
        Some(id) => Ok(store.get(id)?),
        None => Ok(None),
    }
}

/// Parse a body that must be a JSON object.
///
/// Absent, malformed and non-object bodies (arrays included, which derived
/// structs would otherwise accept by position) are all parse failures.
/// Duplicate keys keep the last value.
fn parse_body<T: serde::de::DeserializeOwned>(body: Option<&str>) -> Result<T, String> {
    let body = body.ok_or_else(|| "request body is missing".to_string())?;
    match serde_json::from_str::<Value>(body).map_err(|e| e.to_string())? {
        object @ Value::Object(_) => serde_json::from_value(object).map_err(|e| e.to_string()),
        other => Err(format!("expected a JSON object, got {}", json_kind(&other))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
