// Local gateway module
// Turns HTTP requests into gateway events and gateway responses back into HTTP

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode, Version};
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{self, ApiGatewayEvent, ApiGatewayResponse};
use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

/// Gateway resource whose last segment is the `{id}` path parameter
const ID_RESOURCE_PREFIX: &str = "/books/";

/// Serve one HTTP request through the book API and write the access log line
pub async fn serve_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = match into_event(req, state.config.http.max_body_size).await {
        Ok(event) => state.api.handle(&event),
        Err(rejection) => rejection,
    };

    entry.status = response.status_code;
    entry.body_bytes = response.body.len();
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    if state.config.logging.access_log {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(into_http_response(response))
}

/// Build the gateway event for a request.
///
/// Bodies over `max_body_size` and bodies that are not UTF-8 are answered
/// here, before the handler sees them.
pub async fn into_event<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<ApiGatewayEvent, ApiGatewayResponse>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = declared_length(&req) {
        if size > max_body_size {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(api::payload_too_large(max_body_size));
        }
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_warning(&format!("Request body exceeded {max_body_size} bytes"));
            return Err(api::payload_too_large(max_body_size));
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(api::invalid_body());
        }
    };

    let body = if bytes.is_empty() {
        None
    } else if let Ok(text) = String::from_utf8(bytes.to_vec()) {
        Some(text)
    } else {
        logger::log_warning("Request body is not valid UTF-8");
        return Err(api::invalid_body());
    };

    let path = parts.uri.path();
    let mut event = ApiGatewayEvent::new(parts.method.as_str(), path);
    if let Some(id) = resource_id(path) {
        event = event.with_id(&id);
    }
    event.body = body;
    Ok(event)
}

/// The percent-decoded `{id}` of `/books/{id}`: exactly one non-empty segment.
///
/// A segment that does not decode to UTF-8 is passed through raw.
fn resource_id(path: &str) -> Option<Cow<'_, str>> {
    let raw = path
        .strip_prefix(ID_RESOURCE_PREFIX)
        .filter(|id| !id.is_empty() && !id.contains('/'))?;
    match urlencoding::decode(raw) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            logger::log_debug(&format!("Path id {raw:?} is not valid percent-encoded UTF-8: {e}"));
            Some(Cow::Borrowed(raw))
        }
    }
}

fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    let value = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(size) => Some(size),
        None => {
            logger::log_warning("Invalid Content-Length header, skipping size check");
            None
        }
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Copy status, headers and body of a gateway response onto an HTTP response
fn into_http_response(response: ApiGatewayResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status_code);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build gateway response: {e}"));
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
