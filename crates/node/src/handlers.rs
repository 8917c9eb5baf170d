//! REST surface of the station node.
//!
//! Handlers are deliberately thin: validate, consult the connectivity flag,
//! then either call the gateway or buffer. All shared state lives in
//! [`AppState`] and is passed by handle; nothing here is a global.
//!
//! Queries (`pubkey`, `balance`) go straight to the gateway regardless of
//! connectivity. Only writes are gated by the disconnected flag, and of
//! those only entry submission is buffered — registration while
//! disconnected is rejected outright.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use station_gateway::{ChaincodeCall, InvokeOutcome, LedgerEntry, LedgerGateway};

use crate::backlog::{Backlog, BacklogRecord};
use crate::connectivity::{ConnectivityState, Transition};
use crate::error::ApiError;
use crate::replay::spawn_replay;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The ledger the station fronts.
    pub gateway: Arc<dyn LedgerGateway>,
    /// The disconnected flag.
    pub connectivity: ConnectivityState,
    /// Writes deferred while disconnected.
    pub backlog: Backlog,
}

impl AppState {
    /// Creates fresh state over the given gateway, starting connected with
    /// an empty backlog.
    #[must_use]
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self { gateway, connectivity: ConnectivityState::new(), backlog: Backlog::new() }
    }
}

/// Builds the station router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/disconnected", get(get_disconnected).post(set_disconnected))
        .route("/{user_id}", post(register_user))
        .route("/{user_id}/pubkey", get(get_public_key))
        .route("/{user_id}/balance", get(get_balance))
        .route("/{user_id}/entry", post(submit_entry))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct DisconnectedResponse {
    status: bool,
}

async fn get_disconnected(State(state): State<AppState>) -> Json<DisconnectedResponse> {
    Json(DisconnectedResponse { status: state.connectivity.is_disconnected() })
}

/// Flips the connectivity flag. On the reconnect edge the backlog is
/// drained synchronously and handed to the replay coordinator; the response
/// returns before any replay outcome resolves.
///
/// The body is inspected loosely so that any `status` other than the two
/// string literals maps to a 400, not a deserialization rejection.
async fn set_disconnected(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<&'static str, ApiError> {
    let disconnected = match body.get("status").and_then(serde_json::Value::as_str) {
        Some("true") => true,
        Some("false") => false,
        _ => {
            return Err(ApiError::validation(
                "status must be the literal \"true\" or \"false\"",
            ))
        }
    };

    match state.connectivity.set_disconnected(disconnected) {
        Transition::Disconnected => {
            tracing::info!("station disconnected; buffering entry writes");
        }
        Transition::Reconnected => {
            let drained = state.backlog.drain_and_reset();
            tracing::info!(drained = drained.len(), "station reconnected");
            // Detached; the toggle response never waits for replay.
            drop(spawn_replay(Arc::clone(&state.gateway), drained));
        }
        Transition::Unchanged => {}
    }

    Ok(if disconnected { "Emulating disconnection" } else { "System now connected" })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    pub_key: Option<String>,
}

async fn register_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<InvokeOutcome>, ApiError> {
    let pub_key = body
        .pub_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::validation("pubKey is required"))?;

    // Registration is never buffered.
    if state.connectivity.is_disconnected() {
        return Err(ApiError::validation("cannot register while disconnected"));
    }

    let outcome = state.gateway.invoke(ChaincodeCall::register(&user_id, pub_key)).await?;
    if outcome.is_committed() {
        Ok(Json(outcome))
    } else {
        Err(ApiError::from_outcome(&outcome))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyResponse {
    user_id: String,
    pub_key: String,
}

async fn get_public_key(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicKeyResponse>, ApiError> {
    let payload = state.gateway.query(ChaincodeCall::get_public_key(&user_id)).await?;
    let pub_key = decode_payload(&payload)?;
    Ok(Json(PublicKeyResponse { user_id, pub_key }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    user_id: String,
    balance: String,
}

async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let payload = state.gateway.query(ChaincodeCall::compute_result(&user_id)).await?;
    let balance = decode_payload(&payload)?;
    Ok(Json(BalanceResponse { user_id, balance }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitEntryRequest {
    change: Option<String>,
    unique_id: Option<String>,
    user_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferedNotice {
    status: &'static str,
    user_id: String,
    unique_id: String,
}

async fn submit_entry(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<SubmitEntryRequest>,
) -> Result<axum::response::Response, ApiError> {
    let change = require_field(body.change, "change")?;
    let unique_id = require_field(body.unique_id, "uniqueId")?;
    let user_key = require_field(body.user_key, "userKey")?;

    // The supplied key must match the registered one before anything is
    // enqueued or invoked.
    let payload = state.gateway.query(ChaincodeCall::get_public_key(&user_id)).await?;
    let registered_key = decode_payload(&payload)?;
    if registered_key != user_key {
        return Err(ApiError::authorization(format!(
            "userKey does not match the registered public key for [{user_id}]"
        )));
    }

    let entry = LedgerEntry { user_id: user_id.clone(), change, unique_id, user_key };

    if state.connectivity.is_disconnected() {
        let unique_id = entry.unique_id.clone();
        tracing::debug!(%user_id, %unique_id, "station disconnected; buffering entry");
        state.backlog.add(BacklogRecord::new(entry));
        return Ok(
            Json(BufferedNotice { status: "BUFFERED", user_id, unique_id }).into_response()
        );
    }

    let outcome = state.gateway.invoke(ChaincodeCall::record(&entry)).await?;
    if outcome.is_committed() {
        Ok(Json(outcome).into_response())
    } else {
        Err(ApiError::from_outcome(&outcome))
    }
}

fn require_field(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{name} is required")))
}

fn decode_payload(payload: &[u8]) -> Result<String, ApiError> {
    std::str::from_utf8(payload)
        .map(str::to_owned)
        .map_err(|_| ApiError::gateway("ledger payload is not valid UTF-8"))
}
