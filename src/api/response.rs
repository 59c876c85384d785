// API response utility functions module

use hyper::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::HandlerResult;
use super::event::ApiGatewayResponse;
use super::types::Envelope;

/// Headers sent with every response
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
];

fn default_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

fn raw_response(status: StatusCode, body: String) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: status.as_u16(),
        headers: default_headers(),
        body,
    }
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HandlerResult<ApiGatewayResponse> {
    let body = serde_json::to_string(body)?;
    Ok(raw_response(status, body))
}

/// Envelope response; an envelope always serializes, so failures collapse to 500
fn envelope_response(status: StatusCode, envelope: &Envelope) -> ApiGatewayResponse {
    json_response(status, envelope).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to serialize response: {e}"));
        internal_error()
    })
}

/// 200 preflight response with an empty JSON object body
pub fn preflight() -> ApiGatewayResponse {
    raw_response(StatusCode::OK, "{}".to_string())
}

/// 404 for an identifier that is not in the store
pub fn book_not_found(id: Option<&str>) -> ApiGatewayResponse {
    let error = id.map_or_else(
        || "Book ID was not provided".to_string(),
        |id| format!("Book with ID {id} does not exist"),
    );
    envelope_response(StatusCode::NOT_FOUND, &Envelope::error("Book not found", error))
}

/// 400 for a body missing required fields
pub fn validation_error() -> ApiGatewayResponse {
    envelope_response(
        StatusCode::BAD_REQUEST,
        &Envelope::error("Validation error", "Title and author are required fields"),
    )
}

/// 400 for a body that could not be parsed
pub fn invalid_body() -> ApiGatewayResponse {
    envelope_response(
        StatusCode::BAD_REQUEST,
        &Envelope::error("Invalid request body", "Request body must be valid JSON"),
    )
}

/// 413 for a body above the configured limit
pub fn payload_too_large(limit: u64) -> ApiGatewayResponse {
    envelope_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &Envelope::error(
            "Payload too large",
            format!("Request body must not exceed {limit} bytes"),
        ),
    )
}

/// 404 when no route matched
pub fn route_not_found() -> ApiGatewayResponse {
    envelope_response(
        StatusCode::NOT_FOUND,
        &Envelope::error("Not found", "Endpoint not found"),
    )
}

/// 500 response. The body is a literal so building it cannot fail.
pub fn internal_error() -> ApiGatewayResponse {
    raw_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"Internal server error","error":"An unexpected error occurred"}"#.to_string(),
    )
}
