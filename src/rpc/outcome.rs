//! Outcome normalization.
//!
//! Every call ends in exactly one [`Outcome`]: the procedure's result value or
//! an [`ErrorRecord`] with a stable shape. The functions here are pure; the
//! same input always yields the same record.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::envelope::{Envelope, id_key};
use super::transport::{NetworkFailure, TransportError, TransportResponse};

/// Body text the node sends with a 500 when its internal work queue is full.
pub const WORK_QUEUE_EXCEEDED: &str = "Work queue depth exceeded";

/// Status used when no HTTP status is available.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Status the work-queue-exceeded condition is remapped to.
pub const BACKPRESSURE_STATUS: u16 = 429;

const ERROR_PREFIX: &str = "Ravencoin JSON-RPC: ";
pub const FALLBACK_MESSAGE: &str = "Unknown request failure. Please review: rpc command, arguments and connection.";

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection refused, timeout, DNS failure. No HTTP status was received.
    Network,
    /// The node answered with a status outside 200..=399.
    Http,
    /// The node's work queue is full; retry later.
    Backpressure,
    /// The procedure ran and reported an error inside a successful response.
    Application,
    /// The response body could not be interpreted.
    MalformedResponse,
}

/// Normalized description of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    /// JSON-RPC error code when the node supplied one, otherwise the status.
    pub code: i64,
    pub message: String,
    /// HTTP reason phrase or failure category, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: u16,
    /// The raw request body that produced this failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ErrorRecord {
    pub fn is_backpressure(&self) -> bool {
        self.kind == ErrorKind::Backpressure
    }

    /// True when the same call may succeed if repeated later. Nothing in this
    /// crate retries on its own; the decision is left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Backpressure | ErrorKind::Network)
    }

    pub(crate) fn malformed(message: String, request_body: &str) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            code: DEFAULT_ERROR_STATUS as i64,
            message,
            name: None,
            status: DEFAULT_ERROR_STATUS,
            data: raw_request(request_body),
        }
    }
}

/// The result of one call: exactly one of a result value or an error record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    #[serde(rename = "result")]
    Success(Value),
    #[serde(rename = "error")]
    Failure(ErrorRecord),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(record) => Some(record),
        }
    }

    pub fn into_result(self) -> Result<Value, ErrorRecord> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(record) => Err(record),
        }
    }

    /// Deserializes a successful result into `T`.
    ///
    /// A result that does not have the expected shape becomes a
    /// [`ErrorKind::MalformedResponse`] record.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ErrorRecord> {
        let value = self.into_result()?;
        serde_json::from_value(value)
            .map_err(|e| ErrorRecord::malformed(format!("{ERROR_PREFIX}Unexpected result shape: {e}"), ""))
    }
}

/// Normalizes the outcome of one single-request exchange.
pub fn normalize(request_body: &str, exchange: Result<TransportResponse, TransportError>) -> Outcome {
    match exchange {
        Err(err) => Outcome::Failure(network_error(request_body, &err)),
        Ok(response) if response.is_success() => match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => from_response_value(value, request_body),
            Err(e) => Outcome::Failure(ErrorRecord::malformed(
                format!("{ERROR_PREFIX}Error Parsing JSON: {e}"),
                request_body,
            )),
        },
        Ok(response) => Outcome::Failure(http_error(request_body, &response)),
    }
}

/// Normalizes the outcome of a batch exchange.
///
/// Returns one outcome per envelope, in the order of `envelopes`. Response
/// elements are matched by correlation id, so the node may answer in any
/// order. A failure of the exchange as a whole is reported for every element.
pub fn normalize_batch(
    envelopes: &[Envelope],
    request_body: &str,
    exchange: Result<TransportResponse, TransportError>,
) -> Vec<Outcome> {
    let response = match exchange {
        Err(err) => return repeat(network_error(request_body, &err), envelopes.len()),
        Ok(response) if !response.is_success() => {
            return repeat(http_error(request_body, &response), envelopes.len());
        },
        Ok(response) => response,
    };

    let elements = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Array(elements)) => elements,
        Ok(other) => {
            // A single object in reply to a batch is the node rejecting the batch as a whole.
            let record = match from_response_value(other, request_body) {
                Outcome::Failure(record) => record,
                Outcome::Success(_) => ErrorRecord::malformed(
                    format!("{ERROR_PREFIX}Expected an array in reply to a batch request"),
                    request_body,
                ),
            };
            return repeat(record, envelopes.len());
        },
        Err(e) => {
            let record = ErrorRecord::malformed(format!("{ERROR_PREFIX}Error Parsing JSON: {e}"), request_body);
            return repeat(record, envelopes.len());
        },
    };

    let mut by_id: HashMap<String, Value> = elements
        .into_iter()
        .filter_map(|element| {
            let key = element.get("id").map(id_key)?;
            Some((key, element))
        })
        .collect();

    envelopes
        .iter()
        .map(|envelope| {
            let element_body = envelope.to_body();
            match by_id.remove(&envelope.id) {
                Some(element) => from_response_value(element, &element_body),
                None => Outcome::Failure(ErrorRecord::malformed(
                    format!("{ERROR_PREFIX}No response for request id {}", envelope.id),
                    &element_body,
                )),
            }
        })
        .collect()
}

/// Extracts the result of a decoded response object, or its embedded error.
///
/// A body that is not an object carrying `result` is itself the result, which
/// covers procedures that answer with a bare value.
fn from_response_value(value: Value, request_body: &str) -> Outcome {
    match value {
        Value::Object(mut map) => {
            if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
                return Outcome::Failure(application_error(error, request_body));
            }
            match map.remove("result") {
                Some(result) => Outcome::Success(result),
                None => Outcome::Success(Value::Object(map)),
            }
        },
        other => Outcome::Success(other),
    }
}

fn application_error(error: &Value, request_body: &str) -> ErrorRecord {
    ErrorRecord {
        kind: ErrorKind::Application,
        code: error_code(error).unwrap_or(DEFAULT_ERROR_STATUS as i64),
        message: error_message(error).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        name: None,
        status: DEFAULT_ERROR_STATUS,
        data: raw_request(request_body),
    }
}

fn http_error(request_body: &str, response: &TransportResponse) -> ErrorRecord {
    if response.status == DEFAULT_ERROR_STATUS && response.body.trim() == WORK_QUEUE_EXCEEDED {
        return ErrorRecord {
            kind: ErrorKind::Backpressure,
            code: BACKPRESSURE_STATUS as i64,
            message: format!("{ERROR_PREFIX}{WORK_QUEUE_EXCEEDED}"),
            name: Some("Too Many Requests".to_string()),
            status: BACKPRESSURE_STATUS,
            data: raw_request(request_body),
        };
    }

    let remote_error = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("error").cloned())
        .filter(|error| !error.is_null());

    let message = remote_error
        .as_ref()
        .and_then(error_message)
        .or_else(|| status_message(response.status))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

    ErrorRecord {
        kind: ErrorKind::Http,
        code: remote_error
            .as_ref()
            .and_then(error_code)
            .unwrap_or(response.status as i64),
        message,
        name: response.reason.clone(),
        status: response.status,
        data: raw_request(request_body),
    }
}

fn network_error(request_body: &str, error: &TransportError) -> ErrorRecord {
    let message = if error.message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        format!("{ERROR_PREFIX}Request Error: {}", error.message)
    };
    let name = match error.failure {
        NetworkFailure::Timeout => "Timeout",
        NetworkFailure::Connect => "ConnectionError",
        NetworkFailure::Other => "NetworkError",
    };

    ErrorRecord {
        kind: ErrorKind::Network,
        code: DEFAULT_ERROR_STATUS as i64,
        message,
        name: Some(name.to_string()),
        status: DEFAULT_ERROR_STATUS,
        data: raw_request(request_body),
    }
}

fn status_message(status: u16) -> Option<String> {
    match status {
        401 => Some(format!("{ERROR_PREFIX}Connection Rejected: 401 Unauthorized")),
        403 => Some(format!("{ERROR_PREFIX}Connection Rejected: 403 Forbidden")),
        0 => None,
        other => Some(format!("Request failed with status code {other}")),
    }
}

/// The node reports errors as `{ "code": .., "message": .. }`; some proxies
/// send a bare string instead.
fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn error_code(error: &Value) -> Option<i64> {
    error.get("code").and_then(Value::as_i64)
}

fn raw_request(request_body: &str) -> Option<String> {
    (!request_body.is_empty()).then(|| request_body.to_string())
}

fn repeat(record: ErrorRecord, count: usize) -> Vec<Outcome> {
    vec![Outcome::Failure(record); count]
}
