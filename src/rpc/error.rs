//! Error types raised synchronously by the RPC client.
//!
//! This module defines the [`RpcError`] enum, which covers programming-usage
//! and input-validation failures. These are detected before any request is
//! sent and are returned as `Err` values.
//!
//! Failures of the remote call itself (network, HTTP, backpressure and
//! application errors) are never returned as `RpcError`. They are normalized
//! into an [`ErrorRecord`](crate::rpc::ErrorRecord) carried by the call's
//! [`Outcome`](crate::rpc::Outcome).

use thiserror::Error;

/// Errors that are raised before a call reaches the network.
///
/// # Error Categories
///
/// - **Input validation**: [`MissingField`](RpcError::MissingField),
///   [`DependentField`](RpcError::DependentField),
///   [`InvalidArgument`](RpcError::InvalidArgument)
/// - **Usage errors**: [`BatchAlreadyOpen`](RpcError::BatchAlreadyOpen)
/// - **Construction errors**: [`Config`](RpcError::Config),
///   [`HttpClient`](RpcError::HttpClient)
///
/// # Example
///
/// ```rust
/// use ravencoin_rpc::rpc::RpcError;
///
/// fn describe(err: &RpcError) -> String {
///     match err {
///         RpcError::MissingField { method, field } => format!("{method} needs {field}"),
///         other => other.to_string(),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum RpcError {
    /// A required field of a call was absent or empty.
    #[error("Invalid parameters for {method}: missing required field '{field}'")]
    MissingField {
        /// The remote procedure being encoded.
        method: &'static str,
        /// The name of the missing field.
        field: &'static str,
    },

    /// A field was supplied without the companion field it depends on.
    ///
    /// Positional procedures cannot skip an argument, so a later argument
    /// is only meaningful when the earlier one it depends on is present.
    #[error("Invalid parameters for {method}: '{field}' requires '{requires}' to be supplied")]
    DependentField {
        method: &'static str,
        field: &'static str,
        requires: &'static str,
    },

    /// An argument could not be coerced to the kind the procedure declares.
    #[error("Invalid argument for {method}: {reason}")]
    InvalidArgument { method: String, reason: String },

    /// A batch was opened while another batch on the same client was still open.
    #[error("A batch is already open on this client")]
    BatchAlreadyOpen,

    /// The connection configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl RpcError {
    /// Returns true for errors caused by the caller's input rather than by
    /// how the client is being used.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RpcError::MissingField { .. } | RpcError::DependentField { .. } | RpcError::InvalidArgument { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let err = RpcError::MissingField {
            method: "getassetdata",
            field: "asset_name",
        };
        assert!(err.to_string().contains("asset_name"));
        assert!(err.is_validation());
    }

    #[test]
    fn batch_error_is_not_validation() {
        assert!(!RpcError::BatchAlreadyOpen.is_validation());
    }
}
