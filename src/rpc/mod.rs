//! JSON-RPC client core for Ravencoin nodes.
//!
//! This module turns procedure calls into JSON-RPC 2.0 requests, sends them
//! over HTTP with basic authentication, and normalizes every response into a
//! single [`Outcome`].
//!
//! # Architecture
//!
//! - [`RpcClient`] - Entry point. Owns the configuration, the transport and the admission queue
//! - [`RpcCall`] - Typed request encoding with input validation before any network access
//! - [`Transport`] / [`HttpTransport`] - One HTTP exchange per request, no retries
//! - [`AdmissionQueue`] - Bounds in-flight requests to the node's work queue depth
//! - [`BatchSession`] - Collects calls and sends them as one batch request
//! - [`Outcome`] / [`ErrorRecord`] - Result of every completed call
//!
//! # Error Handling
//!
//! Failures of the remote call itself never surface as `Err`: they are
//! [`Outcome::Failure`] values carrying an [`ErrorRecord`] with a display
//! message, a numeric status and the original request. A status of 429 marks
//! backpressure from the node; the caller decides whether and when to retry.
//!
//! [`RpcError`] is reserved for mistakes in how the client is used: missing or
//! inconsistent call arguments, invalid configuration, or opening a second
//! batch while one is open.

pub mod callspec;
mod client;
mod envelope;
mod error;
mod outcome;
pub mod params;
mod queue;
mod transport;

pub use client::{BatchSession, BatchTicket, RpcClient};
pub use envelope::{Envelope, JSON_RPC_VERSION, Params, batch_body};
pub use error::RpcError;
pub use outcome::{
    BACKPRESSURE_STATUS, DEFAULT_ERROR_STATUS, ErrorKind, ErrorRecord, FALLBACK_MESSAGE, Outcome, WORK_QUEUE_EXCEEDED,
    normalize, normalize_batch,
};
pub use params::RpcCall;
pub use queue::{AdmissionQueue, AdmissionSlot};
pub use transport::{HttpTransport, NetworkFailure, Transport, TransportError, TransportResponse};
