use std::sync::Arc;
use std::time::Duration;

use ravencoin_rpc::config::ClientConfig;
use ravencoin_rpc::methods::assets::ListAssets;
use ravencoin_rpc::methods::rewards::ListSnapshotRequests;
use ravencoin_rpc::methods::wallet::SendToAddress;
use ravencoin_rpc::rpc::{ErrorKind, Outcome, RpcClient, RpcError};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> RpcClient {
    let config = ClientConfig::new(server.uri().parse().unwrap(), "user", "pass");
    RpcClient::new(config).unwrap()
}

#[tokio::test]
async fn test_get_block_count() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .and(body_partial_json(json!({ "jsonrpc": "2.0", "method": "getblockcount", "params": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 123, "error": null, "id": "x" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client.blockchain().get_block_count().await;

    assert_eq!(outcome, Outcome::Success(json!(123)));
    assert_eq!(outcome.decode::<u64>().unwrap(), 123);
}

#[tokio::test]
async fn test_list_snapshot_requests_sends_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "listsnapshotrequests", "params": ["", 0] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [], "error": null, "id": "x" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client
        .rewards()
        .list_snapshot_requests(&ListSnapshotRequests::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Success(json!([])));
}

#[tokio::test]
async fn test_work_queue_exceeded_is_backpressure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Work queue depth exceeded"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = SendToAddress {
        address: "RXaddr".into(),
        amount: 1.0,
        ..Default::default()
    };
    let record = client
        .wallet()
        .send_to_address(&request)
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(record.status, 429);
    assert_eq!(record.kind, ErrorKind::Backpressure);
    assert!(record.is_retryable());
    assert!(record.data.unwrap().contains("\"sendtoaddress\""));
}

#[tokio::test]
async fn test_other_server_errors_keep_their_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "result": null,
            "error": { "code": -5, "message": "Invalid Raven address" },
            "id": "x"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.invoke("validateaddress", vec![json!("nope")]).await.into_result().unwrap_err();

    assert_eq!(record.status, 500);
    assert_eq!(record.kind, ErrorKind::Http);
    assert_eq!(record.code, -5);
    assert_eq!(record.message, "Invalid Raven address");
}

#[tokio::test]
async fn test_unauthorized_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.invoke("getinfo", ()).await.into_result().unwrap_err();

    assert_eq!(record.status, 401);
    assert_eq!(record.message, "Ravencoin JSON-RPC: Connection Rejected: 401 Unauthorized");
}

#[tokio::test]
async fn test_application_error_in_successful_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": null,
            "error": { "code": -8, "message": "Block height out of range" },
            "id": "x"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client
        .blockchain()
        .get_block_hash(99_999_999)
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(record.kind, ErrorKind::Application);
    assert_eq!(record.code, -8);
    assert_eq!(record.status, 500);
    assert_eq!(record.message, "Block height out of range");
}

#[tokio::test]
async fn test_bare_value_and_null_results() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "getdifficulty" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("42.5"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "walletlock" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null, "error": null })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert_eq!(client.blockchain().get_difficulty().await, Outcome::Success(json!(42.5)));
    assert_eq!(client.wallet().wallet_lock().await, Outcome::Success(Value::Null));
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.invoke("getinfo", ()).await.into_result().unwrap_err();

    assert_eq!(record.kind, ErrorKind::MalformedResponse);
    assert_eq!(record.status, 500);
}

#[tokio::test]
async fn test_validation_error_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = ListAssets {
        start: Some(10),
        ..Default::default()
    };
    let err = client.assets().list_assets(&request).await.unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_batch_matches_out_of_order_replies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(|req: &Request| {
            let calls: Vec<Value> = serde_json::from_slice(&req.body).unwrap();
            let replies: Vec<Value> = calls
                .iter()
                .rev()
                .map(|call| json!({ "id": call["id"], "result": call["params"][0], "error": null }))
                .collect();
            ResponseTemplate::new(200).set_body_json(replies)
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut batch = client.open_batch().unwrap();
    let tickets: Vec<_> = (0..5).map(|height| batch.push("getblockhash", vec![json!(height)])).collect();

    assert!(matches!(client.open_batch(), Err(RpcError::BatchAlreadyOpen)));

    let outcomes = batch.flush().await;

    assert_eq!(outcomes.len(), 5);
    for (height, ticket) in tickets.iter().enumerate() {
        assert_eq!(outcomes[ticket.index()], Outcome::Success(json!(height)));
    }
}

#[tokio::test]
async fn test_concurrent_calls_respect_queue_size() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": true }))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(10)
        .mount(&mock_server)
        .await;

    let mut config = ClientConfig::new(mock_server.uri().parse().unwrap(), "user", "pass");
    config.queue_size = 2;
    let client = Arc::new(RpcClient::new(config).unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let client = Arc::clone(&client);
        tasks.spawn(async move {
            let outcome = client.net().ping().await;
            assert!(client.queue().in_flight() <= 2);
            outcome
        });
    }

    while let Some(outcome) = tasks.join_next().await {
        assert!(outcome.unwrap().is_success());
    }
    assert_eq!(client.queue().in_flight(), 0);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap(), "user", "pass");
    let client = RpcClient::new(config).unwrap();

    let record = client.invoke("getblockcount", ()).await.into_result().unwrap_err();

    assert_eq!(record.kind, ErrorKind::Network);
    assert_eq!(record.status, 500);
    assert_eq!(client.queue().in_flight(), 0);
}
