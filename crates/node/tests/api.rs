//! End-to-end tests for the station's REST surface, driving the router
//! directly without sockets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use station_gateway::testutil::{recording_memory_gateway, RecordingMemoryGateway};
use station_gateway::{ChaincodeCall, GatewayError, InvokeOutcome, LedgerGateway};
use station_node::{router, AppState, Backlog, ConnectivityState};
use tower::ServiceExt;

struct TestApp {
    gateway: RecordingMemoryGateway,
    backlog: Backlog,
    connectivity: ConnectivityState,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let gateway = recording_memory_gateway();
        let state = AppState::new(Arc::new(gateway.clone()));
        let backlog = state.backlog.clone();
        let connectivity = state.connectivity.clone();
        Self { gateway, backlog, connectivity, router: router(state) }
    }

    /// Registers a user directly on the in-memory ledger, bypassing the
    /// recording wrapper so call counts stay clean.
    async fn seed_user(&self, user_id: &str, pub_key: &str) {
        let outcome = self
            .gateway
            .inner()
            .invoke(ChaincodeCall::register(user_id, pub_key))
            .await
            .unwrap();
        assert!(outcome.is_committed());
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// Waits until the gateway has recorded `expected` invocations.
    async fn wait_for_invokes(&self, expected: usize) {
        for _ in 0..200 {
            if self.gateway.invoke_calls().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {expected} invocations, saw {}",
            self.gateway.invoke_calls().len()
        );
    }

    /// Waits until the in-memory ledger holds `expected` entries for a user.
    async fn wait_for_committed(&self, user_id: &str, expected: usize) {
        for _ in 0..200 {
            if self.gateway.inner().entry_count(user_id) >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {expected} committed entries for {user_id}, saw {}",
            self.gateway.inner().entry_count(user_id)
        );
    }
}

#[tokio::test]
async fn healthz_answers_without_touching_the_gateway() {
    let app = TestApp::new();

    let (status, body) = app.get("/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
    assert!(app.gateway.calls().is_empty());
}

#[tokio::test]
async fn station_starts_connected() {
    let app = TestApp::new();

    let (status, body) = app.get("/disconnected").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(false));
}

#[tokio::test]
async fn toggling_reports_both_directions() {
    let app = TestApp::new();

    let (status, body) = app.post("/disconnected", json!({"status": "true"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Emulating disconnection".into()));
    assert!(app.connectivity.is_disconnected());

    let (status, body) = app.post("/disconnected", json!({"status": "false"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("System now connected".into()));
    assert!(!app.connectivity.is_disconnected());
}

#[tokio::test]
async fn bad_connectivity_literal_is_rejected() {
    let app = TestApp::new();

    for body in [json!({"status": "yes"}), json!({"status": 1}), json!({})] {
        let (status, _) = app.post("/disconnected", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert!(!app.connectivity.is_disconnected());
}

#[tokio::test]
async fn register_commits_and_returns_the_outcome() {
    let app = TestApp::new();

    let (status, body) = app.post("/alice", json!({"pubKey": "alice-key"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("COMMITTED"));
    assert_eq!(app.gateway.inner().registered_key("alice"), Some("alice-key".into()));
}

#[tokio::test]
async fn register_while_disconnected_is_rejected_without_gateway_calls() {
    let app = TestApp::new();
    app.post("/disconnected", json!({"status": "true"})).await;

    let (status, _) = app.post("/alice", json!({"pubKey": "alice-key"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.gateway.calls().is_empty());
    assert!(app.backlog.is_empty());
}

#[tokio::test]
async fn register_duplicate_user_surfaces_the_rejection() {
    let app = TestApp::new();
    app.seed_user("alice", "k1").await;

    let (status, body) = app.post("/alice", json!({"pubKey": "k2"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body.as_str().unwrap();
    assert!(message.contains("already exists"), "unexpected body: {message}");
}

#[tokio::test]
async fn register_without_pub_key_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app.post("/alice", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.gateway.calls().is_empty());
}

#[tokio::test]
async fn pubkey_query_returns_the_registered_key() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;

    let (status, body) = app.get("/alice/pubkey").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], json!("alice"));
    assert_eq!(body["pubKey"], json!("alice-key"));
}

#[tokio::test]
async fn pubkey_query_for_unknown_user_is_a_gateway_error() {
    let app = TestApp::new();

    let (status, body) = app.get("/ghost/pubkey").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn balance_sums_recorded_entries() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;
    app.post("/alice/entry", json!({"change": "-2", "uniqueId": "u2", "userKey": "alice-key"}))
        .await;

    let (status, body) = app.get("/alice/balance").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], json!("alice"));
    assert_eq!(body["balance"], json!("3"));
}

#[tokio::test]
async fn balance_for_user_without_entries_is_a_gateway_error() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;

    let (status, _) = app.get("/alice/balance").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn entry_missing_unique_id_is_rejected_with_no_gateway_calls() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;

    let (status, _) = app
        .post("/alice/entry", json!({"change": "5", "userKey": "alice-key"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.gateway.calls().is_empty());
    assert!(app.backlog.is_empty());
}

#[tokio::test]
async fn entry_with_mismatched_key_is_rejected_without_side_effects() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;

    let (status, _) = app
        .post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "wrong-key"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    // The key lookup happened, but nothing was invoked or buffered.
    assert_eq!(app.gateway.query_calls().len(), 1);
    assert!(app.gateway.invoke_calls().is_empty());
    assert!(app.backlog.is_empty());
}

#[tokio::test]
async fn entry_while_connected_invokes_once_and_buffers_nothing() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;

    let (status, body) = app
        .post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("COMMITTED"));
    assert_eq!(app.gateway.invoke_calls().len(), 1);
    assert!(app.backlog.is_empty());
}

#[tokio::test]
async fn entry_while_disconnected_buffers_once_and_invokes_nothing() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/disconnected", json!({"status": "true"})).await;

    let (status, body) = app
        .post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("BUFFERED"));
    assert_eq!(body["userId"], json!("alice"));
    assert_eq!(body["uniqueId"], json!("u1"));
    assert!(app.gateway.invoke_calls().is_empty());
    assert_eq!(app.backlog.len(), 1);
    assert_eq!(app.gateway.inner().entry_count("alice"), 0);
}

#[tokio::test]
async fn entry_rejected_by_the_ledger_surfaces_as_server_error() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/alice/entry", json!({"change": "5", "uniqueId": "dup", "userKey": "alice-key"}))
        .await;

    let (status, body) = app
        .post("/alice/entry", json!({"change": "7", "uniqueId": "dup", "userKey": "alice-key"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.as_str().unwrap().contains("already been committed"));
}

#[tokio::test]
async fn entry_timeout_surfaces_as_server_error() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.gateway.push_invoke_outcome(Ok(InvokeOutcome::TimedOut));

    let (status, body) = app
        .post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn reconnect_drains_the_backlog_and_replays_every_entry() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.seed_user("bob", "bob-key").await;
    app.post("/disconnected", json!({"status": "true"})).await;

    app.post("/alice/entry", json!({"change": "5", "uniqueId": "a1", "userKey": "alice-key"}))
        .await;
    app.post("/bob/entry", json!({"change": "3", "uniqueId": "b1", "userKey": "bob-key"}))
        .await;
    assert_eq!(app.backlog.len(), 2);

    let (status, _) = app.post("/disconnected", json!({"status": "false"})).await;
    assert_eq!(status, StatusCode::OK);
    // Drained synchronously, before any replay outcome resolves.
    assert!(app.backlog.is_empty());

    app.wait_for_invokes(2).await;
    let replayed = app.gateway.invoke_calls();
    assert_eq!(replayed.len(), 2);
    assert!(replayed.iter().all(|c| c.function == "record"));

    let mut users: Vec<_> = replayed.iter().map(|c| c.args[0].clone()).collect();
    users.sort();
    assert_eq!(users, vec!["alice", "bob"]);

    app.wait_for_committed("alice", 1).await;
    app.wait_for_committed("bob", 1).await;
}

#[tokio::test]
async fn toggling_connected_twice_triggers_no_second_replay() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/disconnected", json!({"status": "true"})).await;
    app.post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;

    app.post("/disconnected", json!({"status": "false"})).await;
    app.wait_for_invokes(1).await;

    app.post("/disconnected", json!({"status": "false"})).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(app.gateway.invoke_calls().len(), 1);
}

#[tokio::test]
async fn queries_are_not_gated_by_disconnection() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;
    app.post("/disconnected", json!({"status": "true"})).await;

    let (status, body) = app.get("/alice/pubkey").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pubKey"], json!("alice-key"));

    let (status, body) = app.get("/alice/balance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!("5"));
}

#[tokio::test]
async fn failed_replay_is_terminal_and_never_resubmitted() {
    let app = TestApp::new();
    app.seed_user("alice", "alice-key").await;
    app.post("/disconnected", json!({"status": "true"})).await;
    app.post("/alice/entry", json!({"change": "5", "uniqueId": "u1", "userKey": "alice-key"}))
        .await;

    app.gateway.push_invoke_outcome(Err(GatewayError::transport("peer down")));
    app.post("/disconnected", json!({"status": "false"})).await;
    app.wait_for_invokes(1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // One attempt, then the record is dropped: not re-buffered, not retried.
    assert_eq!(app.gateway.invoke_calls().len(), 1);
    assert!(app.backlog.is_empty());
    assert_eq!(app.gateway.inner().entry_count("alice"), 0);
}
