//! Typed construction of chaincode calls.
//!
//! The station only ever issues four chaincode operations. The constructors
//! here are the single place where chaincode names, function names, and
//! argument order are spelled out, so handlers and the replay path cannot
//! drift apart on the wire format.

use crate::types::LedgerEntry;

/// The account chaincode (user registration and key lookup).
pub const ACCOUNT_CHAINCODE: &str = "account";
/// The chronicle chaincode (per-user update log).
pub const CHRONICLE_CHAINCODE: &str = "chronicle";

/// A chaincode function call: which program, which function, which args.
///
/// Arguments are positional strings, matching the ledger's proposal format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeCall {
    /// Chaincode identifier.
    pub chaincode: String,
    /// Function name within the chaincode.
    pub function: String,
    /// Positional string arguments.
    pub args: Vec<String>,
}

impl ChaincodeCall {
    /// Builds an arbitrary call. Prefer the typed constructors below.
    pub fn new(
        chaincode: impl Into<String>,
        function: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self { chaincode: chaincode.into(), function: function.into(), args }
    }

    /// `account.register [userId, pubKey]` — registers a new user key.
    pub fn register(user_id: impl Into<String>, pub_key: impl Into<String>) -> Self {
        Self::new(ACCOUNT_CHAINCODE, "register", vec![user_id.into(), pub_key.into()])
    }

    /// `account.getPublicKey [userId]` — looks up a registered key.
    pub fn get_public_key(user_id: impl Into<String>) -> Self {
        Self::new(ACCOUNT_CHAINCODE, "getPublicKey", vec![user_id.into()])
    }

    /// `chronicle.record [userId, change, uniqueId, userKey]` — appends an
    /// entry to the user's chronicle.
    pub fn record(entry: &LedgerEntry) -> Self {
        Self::new(
            CHRONICLE_CHAINCODE,
            "record",
            vec![
                entry.user_id.clone(),
                entry.change.clone(),
                entry.unique_id.clone(),
                entry.user_key.clone(),
            ],
        )
    }

    /// `chronicle.computeResult [userId]` — collapses the user's chronicle
    /// into its current value.
    pub fn compute_result(user_id: impl Into<String>) -> Self {
        Self::new(CHRONICLE_CHAINCODE, "computeResult", vec![user_id.into()])
    }
}

impl std::fmt::Display for ChaincodeCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.chaincode, self.function)
    }
}
