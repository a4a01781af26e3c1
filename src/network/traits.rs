//! Request executor traits and types

use super::error::RequestError;
use async_trait::async_trait;
use serde_json::Value;

/// Status code the OCS API answers successful calls with
pub const STATUS_OK: u16 = 200;

/// GET request against the account's API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path below the server base URL
    pub path: String,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a GET request for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Value of a query parameter
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status code plus parsed payload of a finished request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Successful response with a JSON body
    pub fn ok(body: Value) -> Self {
        Self::new(STATUS_OK, body)
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Payload inside the `{"ocs": {"data": ...}}` envelope
    pub fn ocs_data(&self) -> Option<&Value> {
        self.body.get("ocs")?.get("data")
    }

    /// Turn a non-success status into an error
    pub fn into_result(self) -> Result<Self, RequestError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RequestError::Status(self.status))
        }
    }
}

/// Executes API requests on behalf of the search model.
///
/// Any HTTP status is reported as a response; only transport level
/// failures are errors.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RequestError>;
}
