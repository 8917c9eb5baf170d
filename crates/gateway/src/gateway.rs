//! The ledger gateway trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{call::ChaincodeCall, error::Result, types::InvokeOutcome};

/// Opaque contract for reading from and writing to the ledger.
///
/// Implementations must be safe to share across request tasks
/// (`Send + Sync`); the station holds one behind an `Arc<dyn LedgerGateway>`
/// and calls it from every handler concurrently.
///
/// # Semantics
///
/// - [`query`](Self::query) is a read with no ordering or commit step. It
///   either yields the chaincode's payload or fails with a
///   [`GatewayError`](crate::GatewayError).
/// - [`invoke`](Self::invoke) is a write requiring proposal, ordering, and
///   commit confirmation. When the gateway manages to submit it at all, the
///   call resolves to a terminal [`InvokeOutcome`] within the
///   implementation's commit-wait window — it never pends indefinitely.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Executes a read-only chaincode function and returns its payload.
    async fn query(&self, call: ChaincodeCall) -> Result<Bytes>;

    /// Submits a chaincode transaction and waits for its terminal outcome.
    async fn invoke(&self, call: ChaincodeCall) -> Result<InvokeOutcome>;
}
