//! The RPC client: the single entry point every call goes through.
//!
//! A call flows through the [`Params`] encoding of its procedure, the
//! [`AdmissionQueue`], the [`Transport`] and finally the outcome normalizer.
//! Every call yields exactly one [`Outcome`]; only programming-usage and
//! input-validation problems are returned as [`RpcError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ravencoin_rpc::config::ClientConfig;
//! use ravencoin_rpc::rpc::RpcClient;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let config = ClientConfig::new("http://127.0.0.1:8766".parse()?, "user", "pass");
//! let client = RpcClient::new(config)?;
//!
//! match client.invoke("getblockcount", ()).await.into_result() {
//!     Ok(height) => println!("height {height}"),
//!     Err(e) if e.is_backpressure() => println!("node busy, try again later"),
//!     Err(e) => println!("failed with status {}: {}", e.status, e.message),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use super::envelope::{Envelope, Params, batch_body};
use super::error::RpcError;
use super::outcome::{self, ErrorKind, ErrorRecord, Outcome};
use super::params::RpcCall;
use super::queue::AdmissionQueue;
use super::transport::{HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::log::mask_string;

/// Client for the JSON-RPC interface of a Ravencoin node.
///
/// `RpcClient` is safe to share across tasks (wrap it in an `Arc`). The
/// configuration is immutable after construction; the admission queue and
/// the batch accumulator are the only mutable shared state.
pub struct RpcClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    queue: AdmissionQueue,
    batch: Mutex<Option<Vec<Envelope>>>,
}

impl RpcClient {
    /// Creates a client talking HTTP to the configured endpoint.
    pub fn new(config: ClientConfig) -> Result<Self, RpcError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        debug!(
            endpoint = config.url.as_str(),
            user = &*mask_string(&config.username),
            queue_size = config.queue_size;
            "RPC client created"
        );
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of any transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let queue = AdmissionQueue::new(config.queue_size);
        Self {
            config: Arc::new(config),
            transport,
            queue,
            batch: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }

    /// Invokes `method` with already-encoded parameters.
    pub async fn invoke(&self, method: &str, params: impl Into<Params>) -> Outcome {
        let envelope = Envelope::new(method, params.into());
        self.dispatch(envelope).await
    }

    /// Encodes a typed call and invokes it.
    ///
    /// Encoding errors are returned before anything is sent.
    pub async fn call<C: RpcCall>(&self, call: &C) -> Result<Outcome, RpcError> {
        let params = call.encode()?;
        Ok(self.invoke(C::METHOD, params).await)
    }

    /// Starts collecting calls into a single batch request.
    ///
    /// Only one batch may be open per client at a time. Calls made directly on
    /// the client while it is open are not collected; see [`BatchSession`].
    pub fn open_batch(&self) -> Result<BatchSession<'_>, RpcError> {
        let mut batch = self.lock_batch();
        if batch.is_some() {
            return Err(RpcError::BatchAlreadyOpen);
        }
        *batch = Some(Vec::new());
        trace!("RPC: batch opened");
        Ok(BatchSession {
            client: self,
            active: true,
        })
    }

    pub fn is_batch_open(&self) -> bool {
        self.lock_batch().is_some()
    }

    /// Stops admitting new requests. Calls waiting for a slot, and any made
    /// afterwards, complete with a failure outcome.
    pub fn shutdown(&self) {
        self.queue.close();
    }

    async fn dispatch(&self, envelope: Envelope) -> Outcome {
        let body = envelope.to_body();
        trace!(method = &*envelope.method, id = &*envelope.id; "RPC: pending");

        let Some(_slot) = self.queue.acquire().await else {
            return Outcome::Failure(shutdown_record(&body));
        };
        debug!(method = &*envelope.method, id = &*envelope.id; "RPC: sent");

        let exchange = self.transport.send(&body).await;
        let outcome = outcome::normalize(&body, exchange);
        log_completion(&envelope.method, &envelope.id, &outcome);
        outcome
    }

    async fn dispatch_batch(&self, envelopes: Vec<Envelope>) -> Vec<Outcome> {
        if envelopes.is_empty() {
            return Vec::new();
        }
        let body = batch_body(&envelopes);

        let Some(_slot) = self.queue.acquire().await else {
            return vec![Outcome::Failure(shutdown_record(&body)); envelopes.len()];
        };
        debug!(calls = envelopes.len(); "RPC: batch sent");

        let exchange = self.transport.send(&body).await;
        let outcomes = outcome::normalize_batch(&envelopes, &body, exchange);
        for (envelope, outcome) in envelopes.iter().zip(&outcomes) {
            log_completion(&envelope.method, &envelope.id, outcome);
        }
        outcomes
    }

    fn lock_batch(&self) -> MutexGuard<'_, Option<Vec<Envelope>>> {
        self.batch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Position of a call inside a flushed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchTicket(usize);

impl BatchTicket {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An open batch on an [`RpcClient`].
///
/// Calls pushed here are held back and sent together by [`flush`](Self::flush)
/// as one request, taking a single admission slot. Dropping the session
/// without flushing discards the collected calls.
///
/// Only calls pushed through the session are collected. [`RpcClient::invoke`]
/// and the typed domain handles keep sending immediately while a batch is
/// open, so other tasks sharing the client are never held back by it.
///
/// ```rust,no_run
/// # use ravencoin_rpc::rpc::RpcClient;
/// # async fn example(client: &RpcClient) -> Result<(), ravencoin_rpc::rpc::RpcError> {
/// let mut batch = client.open_batch()?;
/// let count = batch.push("getblockcount", ());
/// let best = batch.push("getbestblockhash", ());
/// let outcomes = batch.flush().await;
/// println!("{:?} {:?}", outcomes[count.index()], outcomes[best.index()]);
/// # Ok(())
/// # }
/// ```
pub struct BatchSession<'a> {
    client: &'a RpcClient,
    active: bool,
}

impl BatchSession<'_> {
    pub fn push(&mut self, method: &str, params: impl Into<Params>) -> BatchTicket {
        let mut batch = self.client.lock_batch();
        let pending = batch.get_or_insert_with(Vec::new);
        pending.push(Envelope::new(method, params.into()));
        BatchTicket(pending.len() - 1)
    }

    /// Encodes a typed call and appends it. Nothing is appended on error.
    pub fn push_call<C: RpcCall>(&mut self, call: &C) -> Result<BatchTicket, RpcError> {
        let params = call.encode()?;
        Ok(self.push(C::METHOD, params))
    }

    pub fn len(&self) -> usize {
        self.client.lock_batch().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sends every collected call as one batch request and closes the batch.
    ///
    /// Returns one outcome per pushed call, indexed by its [`BatchTicket`].
    pub async fn flush(mut self) -> Vec<Outcome> {
        let envelopes = self.client.lock_batch().take().unwrap_or_default();
        self.active = false;
        trace!(calls = envelopes.len(); "RPC: batch flushed");
        self.client.dispatch_batch(envelopes).await
    }
}

impl Drop for BatchSession<'_> {
    fn drop(&mut self) {
        if self.active {
            let discarded = self.client.lock_batch().take().map_or(0, |pending| pending.len());
            if discarded > 0 {
                warn!(calls = discarded; "RPC: batch dropped without flush, calls discarded");
            }
        }
    }
}

fn shutdown_record(request_body: &str) -> ErrorRecord {
    ErrorRecord {
        kind: ErrorKind::Network,
        code: outcome::DEFAULT_ERROR_STATUS as i64,
        message: "Ravencoin JSON-RPC: client is shut down".to_string(),
        name: Some("Shutdown".to_string()),
        status: outcome::DEFAULT_ERROR_STATUS,
        data: Some(request_body.to_string()),
    }
}

fn log_completion(method: &str, id: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Success(_) => debug!(method = method, id = id; "RPC: completed"),
        Outcome::Failure(record) => warn!(
            method = method,
            id = id,
            status = record.status,
            kind:? = record.kind,
            error = &*record.message;
            "RPC: completed with error"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::transport::{NetworkFailure, TransportError, TransportResponse};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    type Responder = Box<dyn Fn(&str) -> Result<TransportResponse, TransportError> + Send + Sync>;

    struct StubTransport {
        responder: Responder,
        delay: Duration,
        sends: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        bodies: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn new(responder: Responder) -> Arc<Self> {
            Self::with_delay(responder, Duration::ZERO)
        }

        fn with_delay(responder: Responder, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                responder,
                delay,
                sends: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                bodies: Mutex::new(Vec::new()),
            })
        }

        fn replying(status: u16, body: &'static str) -> Arc<Self> {
            Self::new(Box::new(move |_: &str| Ok(TransportResponse::new(status, body.to_string()))))
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, body: &str) -> Result<TransportResponse, TransportError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().unwrap().push(body.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            (self.responder)(body)
        }
    }

    fn config(queue_size: usize) -> ClientConfig {
        let mut config = ClientConfig::new("http://127.0.0.1:8766".parse().unwrap(), "user", "pass");
        config.queue_size = queue_size;
        config
    }

    fn client_with(transport: Arc<StubTransport>, queue_size: usize) -> RpcClient {
        RpcClient::with_transport(config(queue_size), transport)
    }

    #[tokio::test]
    async fn invoke_returns_result_value() {
        let transport = StubTransport::replying(200, r#"{"result":123,"error":null,"id":"x"}"#);
        let client = client_with(transport.clone(), 4);

        let outcome = client.invoke("getblockcount", ()).await;

        assert_eq!(outcome, Outcome::Success(json!(123)));
        assert_eq!(transport.sends.load(Ordering::SeqCst), 1);

        let sent: Value = serde_json::from_str(&transport.bodies.lock().unwrap()[0]).unwrap();
        assert_eq!(sent["method"], "getblockcount");
        assert_eq!(sent["params"], json!([]));
        assert_eq!(sent["jsonrpc"], "2.0");
    }

    #[tokio::test]
    async fn work_queue_exceeded_becomes_429() {
        let transport = StubTransport::replying(500, "Work queue depth exceeded");
        let client = client_with(transport, 4);

        let outcome = client
            .invoke("sendtoaddress", vec![json!("RXaddr"), json!(1.5)])
            .await;

        let record = outcome.error().unwrap();
        assert_eq!(record.status, 429);
        assert!(record.is_backpressure());
        assert!(record.data.as_deref().unwrap().contains("sendtoaddress"));
    }

    #[tokio::test]
    async fn network_failure_releases_slot() {
        let transport = StubTransport::new(Box::new(|_: &str| {
            Err(TransportError::new(NetworkFailure::Timeout, "operation timed out"))
        }));
        let client = client_with(transport, 1);

        for _ in 0..3 {
            let record = client.invoke("getblockcount", ()).await.into_result().unwrap_err();
            assert_eq!(record.kind, ErrorKind::Network);
            assert_eq!(record.status, 500);
        }
        assert_eq!(client.queue().in_flight(), 0);
    }

    #[tokio::test]
    async fn validation_fails_before_sending() {
        use crate::methods::assets::ListAssets;

        let transport = StubTransport::replying(200, r#"{"result":[]}"#);
        let client = client_with(transport.clone(), 4);

        let call = ListAssets {
            start: Some(10),
            ..Default::default()
        };
        let err = client.call(&call).await.unwrap_err();

        assert!(matches!(err, RpcError::DependentField { field: "start", .. }));
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_capacity() {
        let transport = StubTransport::with_delay(
            Box::new(|_: &str| Ok(TransportResponse::new(200, r#"{"result":true}"#.to_string()))),
            Duration::from_millis(20),
        );
        let client = Arc::new(client_with(transport.clone(), 3));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..12 {
            let client = Arc::clone(&client);
            tasks.spawn(async move { client.invoke("ping", ()).await });
        }

        let mut completed = 0;
        while let Some(outcome) = tasks.join_next().await {
            assert!(outcome.unwrap().is_success());
            completed += 1;
        }

        assert_eq!(completed, 12);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(transport.sends.load(Ordering::SeqCst), 12);
        assert_eq!(client.queue().in_flight(), 0);
    }

    #[tokio::test]
    async fn batch_is_one_request_matched_by_id() {
        // Reply in reverse order to prove matching is by id.
        let transport = StubTransport::new(Box::new(|body: &str| {
            let requests: Vec<Value> = serde_json::from_str(body).unwrap();
            let replies: Vec<Value> = requests
                .iter()
                .rev()
                .map(|r| json!({ "id": r["id"], "result": r["method"], "error": null }))
                .collect();
            Ok(TransportResponse::new(200, Value::Array(replies).to_string()))
        }));
        let client = client_with(transport.clone(), 2);

        let mut batch = client.open_batch().unwrap();
        let tickets: Vec<BatchTicket> = ["getblockcount", "getbestblockhash", "getconnectioncount"]
            .iter()
            .map(|method| batch.push(method, ()))
            .collect();
        assert_eq!(batch.len(), 3);
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);

        let outcomes = batch.flush().await;

        assert_eq!(transport.sends.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[tickets[0].index()], Outcome::Success(json!("getblockcount")));
        assert_eq!(outcomes[tickets[1].index()], Outcome::Success(json!("getbestblockhash")));
        assert_eq!(outcomes[tickets[2].index()], Outcome::Success(json!("getconnectioncount")));
        assert!(!client.is_batch_open());
    }

    #[tokio::test]
    async fn batch_is_not_reentrant() {
        let client = client_with(StubTransport::replying(200, "[]"), 2);

        let batch = client.open_batch().unwrap();
        assert!(matches!(client.open_batch(), Err(RpcError::BatchAlreadyOpen)));

        drop(batch);
        assert!(!client.is_batch_open());
        assert!(client.open_batch().is_ok());
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let transport = StubTransport::replying(200, "[]");
        let client = client_with(transport.clone(), 2);

        let outcomes = client.open_batch().unwrap().flush().await;

        assert!(outcomes.is_empty());
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn direct_calls_are_not_captured_by_an_open_batch() {
        let transport = StubTransport::replying(200, r#"{"result":1}"#);
        let client = client_with(transport.clone(), 2);

        let mut batch = client.open_batch().unwrap();
        batch.push("getblockcount", ());
        let outcome = client.invoke("getconnectioncount", ()).await;

        assert!(outcome.is_success());
        assert_eq!(batch.len(), 1);
        assert_eq!(transport.sends.load(Ordering::SeqCst), 1);

        assert!(client.blockchain().get_block_count().await.is_success());
        assert_eq!(batch.len(), 1);
        assert_eq!(transport.sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn shutdown_fails_new_calls() {
        let transport = StubTransport::replying(200, r#"{"result":1}"#);
        let client = client_with(transport.clone(), 2);

        client.shutdown();
        let record = client.invoke("getblockcount", ()).await.into_result().unwrap_err();

        assert_eq!(record.name.as_deref(), Some("Shutdown"));
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_queue_is_rejected_without_panicking() {
        let result = RpcClient::new(config(usize::MAX));
        assert!(matches!(result, Err(RpcError::Config(_))));

        let transport = StubTransport::replying(200, r#"{"result":1}"#);
        let client = client_with(transport, usize::MAX);
        assert_eq!(client.queue().capacity(), Semaphore::MAX_PERMITS);
        assert!(client.invoke("getblockcount", ()).await.is_success());
    }
}
