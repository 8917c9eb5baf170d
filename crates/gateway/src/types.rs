//! Core gateway value types.

use serde::{Deserialize, Serialize};

/// A single chronicle update submitted on behalf of a user.
///
/// Entries are immutable once created. `change` is an opaque payload the
/// chaincode interprets (the chronicle chaincode parses it as an integer
/// delta); `unique_id` is the caller-supplied idempotency token the
/// chaincode deduplicates on; `user_key` is the public key the caller claims
/// for the user, checked against the registered key before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// User the entry belongs to.
    pub user_id: String,
    /// Opaque change payload, forwarded to the chaincode verbatim.
    pub change: String,
    /// Caller-supplied idempotency token.
    pub unique_id: String,
    /// Claimed public key for the user.
    pub user_key: String,
}

/// Terminal result of a ledger invocation.
///
/// Every invocation the gateway manages to submit resolves to exactly one of
/// these variants; none of them pends indefinitely. A commit confirmation
/// that does not arrive within the configured window resolves to
/// [`TimedOut`](InvokeOutcome::TimedOut) rather than hanging the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvokeOutcome {
    /// The transaction was ordered and committed.
    Committed {
        /// Transaction identifier assigned by the ledger.
        tx_id: String,
    },
    /// The proposal or commit was rejected by the network.
    Rejected {
        /// Reason reported by the chaincode or peer.
        reason: String,
    },
    /// No commit confirmation arrived within the commit-wait window.
    ///
    /// The transaction may still commit later; the gateway does not track it
    /// past this point.
    TimedOut,
}

impl InvokeOutcome {
    /// Returns `true` for a committed outcome.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Short lowercase label for log fields.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Committed { .. } => "committed",
            Self::Rejected { .. } => "rejected",
            Self::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for InvokeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Committed { tx_id } => write!(f, "committed (tx {tx_id})"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::TimedOut => write!(f, "commit wait timed out"),
        }
    }
}
