//! In-process ledger implementation.
//!
//! [`MemoryLedger`] implements the account and chronicle chaincodes directly
//! in memory. It is primarily intended for tests and development, and doubles
//! as the standalone backend when the station is run without a peer endpoint.
//!
//! # Semantics
//!
//! The implementation matches the deployed chaincode behavior:
//!
//! - `account.register` refuses to overwrite an existing user.
//! - `chronicle.record` rejects a duplicate `uniqueId` for the same user —
//!   the at-most-once guard that makes replaying a buffered entry safe.
//! - `chronicle.computeResult` sums the recorded changes.
//!
//! # Limitations
//!
//! - Data is not persisted; all state is lost when the process exits.
//! - Commits are immediate: `invoke` never yields
//!   [`InvokeOutcome::TimedOut`].

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    call::{ChaincodeCall, ACCOUNT_CHAINCODE, CHRONICLE_CHAINCODE},
    error::{GatewayError, Result},
    gateway::LedgerGateway,
    types::InvokeOutcome,
};

/// One recorded chronicle update.
#[derive(Debug, Clone)]
struct ChronicleEntry {
    change: i64,
    unique_id: String,
}

/// Shared mutable ledger state.
#[derive(Debug, Default)]
struct State {
    /// userId → registered public key.
    accounts: HashMap<String, String>,
    /// userId → recorded updates, in commit order.
    chronicles: HashMap<String, Vec<ChronicleEntry>>,
}

/// In-memory implementation of [`LedgerGateway`].
///
/// # Cloning
///
/// `MemoryLedger` is cheaply cloneable via [`Arc`]; all clones share the
/// same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<State>>,
    tx_counter: Arc<AtomicU64>,
}

impl MemoryLedger {
    /// Creates an empty in-memory ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registered public key for a user, if any.
    ///
    /// Test convenience accessor; production callers go through
    /// [`query`](LedgerGateway::query).
    #[must_use]
    pub fn registered_key(&self, user_id: &str) -> Option<String> {
        self.state.read().accounts.get(user_id).cloned()
    }

    /// Returns the number of recorded entries for a user.
    #[must_use]
    pub fn entry_count(&self, user_id: &str) -> usize {
        self.state.read().chronicles.get(user_id).map_or(0, Vec::len)
    }

    fn next_tx_id(&self) -> String {
        format!("mem-tx-{}", self.tx_counter.fetch_add(1, Ordering::Relaxed))
    }

    fn register(&self, args: &[String]) -> InvokeOutcome {
        let [user_id, pub_key] = args else {
            return InvokeOutcome::Rejected {
                reason: "incorrect arguments: expecting a userId and a public key".into(),
            };
        };

        let mut state = self.state.write();
        if state.accounts.contains_key(user_id) {
            return InvokeOutcome::Rejected {
                reason: format!("the userId [{user_id}] already exists"),
            };
        }
        state.accounts.insert(user_id.clone(), pub_key.clone());
        drop(state);

        InvokeOutcome::Committed { tx_id: self.next_tx_id() }
    }

    fn record(&self, args: &[String]) -> InvokeOutcome {
        let [user_id, change, unique_id, _user_key] = args else {
            return InvokeOutcome::Rejected {
                reason: "incorrect arguments: expecting a userId, a change, a uniqueId, and the user key"
                    .into(),
            };
        };

        let Ok(change) = change.parse::<i64>() else {
            return InvokeOutcome::Rejected {
                reason: format!("error converting argument [{change}] to an integer"),
            };
        };

        let mut state = self.state.write();
        let entries = state.chronicles.entry(user_id.clone()).or_default();
        if entries.iter().any(|e| e.unique_id == *unique_id) {
            return InvokeOutcome::Rejected {
                reason: format!("the entry [{unique_id}] has already been committed"),
            };
        }
        entries.push(ChronicleEntry { change, unique_id: unique_id.clone() });
        drop(state);

        InvokeOutcome::Committed { tx_id: self.next_tx_id() }
    }

    fn get_public_key(&self, args: &[String]) -> Result<Bytes> {
        let [user_id] = args else {
            return Err(GatewayError::chaincode("incorrect arguments: expecting a userId"));
        };

        self.state
            .read()
            .accounts
            .get(user_id)
            .map(|key| Bytes::from(key.clone()))
            .ok_or_else(|| GatewayError::chaincode(format!("userId not found: [{user_id}]")))
    }

    fn compute_result(&self, args: &[String]) -> Result<Bytes> {
        let [user_id] = args else {
            return Err(GatewayError::chaincode("incorrect arguments: expecting a userId"));
        };

        let state = self.state.read();
        let entries = state
            .chronicles
            .get(user_id)
            .ok_or_else(|| GatewayError::chaincode(format!("no entry for userId [{user_id}]")))?;

        let total: i64 = entries.iter().map(|e| e.change).sum();
        Ok(Bytes::from(total.to_string()))
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn query(&self, call: ChaincodeCall) -> Result<Bytes> {
        match (call.chaincode.as_str(), call.function.as_str()) {
            (ACCOUNT_CHAINCODE, "getPublicKey") => self.get_public_key(&call.args),
            (CHRONICLE_CHAINCODE, "computeResult") => self.compute_result(&call.args),
            _ => Err(GatewayError::chaincode(format!(
                "the provided function \"{call}\" is not supported"
            ))),
        }
    }

    async fn invoke(&self, call: ChaincodeCall) -> Result<InvokeOutcome> {
        let outcome = match (call.chaincode.as_str(), call.function.as_str()) {
            (ACCOUNT_CHAINCODE, "register") => self.register(&call.args),
            (CHRONICLE_CHAINCODE, "record") => self.record(&call.args),
            _ => InvokeOutcome::Rejected {
                reason: format!("the provided function \"{call}\" is not supported"),
            },
        };
        tracing::debug!(call = %call, outcome = outcome.label(), "in-memory invoke");
        Ok(outcome)
    }
}
