// Gateway event types
// Proxy-integration request/response shapes exchanged with the API gateway

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Inbound gateway event describing one HTTP request.
///
/// Only the fields the book API reads are modelled; everything else the
/// gateway sends (headers, requestContext, ...) is ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    /// Template parameters of the matched gateway resource, e.g. `{id}`
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    /// Raw request body
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiGatewayEvent {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            http_method: method.to_string(),
            path: path.to_string(),
            path_parameters: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert("id".to_string(), id.to_string());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The `{id}` path parameter, if the gateway supplied one
    pub fn path_id(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get("id"))
            .map(String::as_str)
    }
}

/// Outbound gateway response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON body
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
