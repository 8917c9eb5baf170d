//! Shared test doubles for gateway consumers.
//!
//! This module is feature-gated behind `testutil` to prevent leaking into
//! production builds. Enable it in `[dev-dependencies]`:
//!
//! ```toml
//! [dev-dependencies]
//! station-gateway = { path = "../gateway", features = ["testutil"] }
//! ```

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::{ChaincodeCall, GatewayError, InvokeOutcome, LedgerGateway, Result};

/// Whether a recorded call was a query or an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// A read-only query.
    Query,
    /// A transaction submission.
    Invoke,
}

/// One call observed by a [`RecordingGateway`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Query or invoke.
    pub kind: CallKind,
    /// The full call, including arguments.
    pub call: ChaincodeCall,
}

/// A gateway wrapper that records every call before delegating to an inner
/// gateway, with optional scripted invoke outcomes.
///
/// Scripted outcomes (pushed via [`push_invoke_outcome`]) are consumed in
/// FIFO order before the inner gateway is consulted, which lets tests
/// simulate rejections and commit timeouts that the in-memory ledger never
/// produces on its own.
///
/// [`push_invoke_outcome`]: RecordingGateway::push_invoke_outcome
#[derive(Clone)]
pub struct RecordingGateway<G> {
    inner: G,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    scripted_outcomes: Arc<Mutex<VecDeque<Result<InvokeOutcome>>>>,
}

impl<G: LedgerGateway> RecordingGateway<G> {
    /// Wraps the given gateway.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            scripted_outcomes: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Returns every call recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns only the recorded invocations.
    #[must_use]
    pub fn invoke_calls(&self) -> Vec<ChaincodeCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.kind == CallKind::Invoke)
            .map(|c| c.call.clone())
            .collect()
    }

    /// Returns only the recorded queries.
    #[must_use]
    pub fn query_calls(&self) -> Vec<ChaincodeCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.kind == CallKind::Query)
            .map(|c| c.call.clone())
            .collect()
    }

    /// Queues a scripted result for the next invocation.
    pub fn push_invoke_outcome(&self, outcome: Result<InvokeOutcome>) {
        self.scripted_outcomes.lock().push_back(outcome);
    }

    /// Returns a reference to the wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: LedgerGateway> LedgerGateway for RecordingGateway<G> {
    async fn query(&self, call: ChaincodeCall) -> Result<Bytes> {
        self.calls.lock().push(RecordedCall { kind: CallKind::Query, call: call.clone() });
        self.inner.query(call).await
    }

    async fn invoke(&self, call: ChaincodeCall) -> Result<InvokeOutcome> {
        self.calls.lock().push(RecordedCall { kind: CallKind::Invoke, call: call.clone() });

        if let Some(scripted) = self.scripted_outcomes.lock().pop_front() {
            return scripted;
        }
        self.inner.invoke(call).await
    }
}

/// Convenience alias used by most station tests.
pub type RecordingMemoryGateway = RecordingGateway<crate::MemoryLedger>;

/// Creates a recording gateway over a fresh [`MemoryLedger`](crate::MemoryLedger).
#[must_use]
pub fn recording_memory_gateway() -> RecordingMemoryGateway {
    RecordingGateway::new(crate::MemoryLedger::new())
}
