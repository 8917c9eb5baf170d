//! Ledger gateway contract for the station node.
//!
//! This crate defines [`LedgerGateway`], the opaque contract through which
//! the station submits writes to and reads from the permissioned ledger.
//! The station never talks to peers, orderers, or crypto suites directly:
//! everything it needs from the network is "run this chaincode function with
//! these arguments", and everything it needs back is a payload (for queries)
//! or a terminal [`InvokeOutcome`] (for invocations).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   station-node                              │
//! │     HTTP handlers │ backlog │ replay coordinator            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   station-gateway                           │
//! │              LedgerGateway trait                            │
//! │            (query, invoke → outcome)                        │
//! ├──────────────┬──────────────────────────────────────────────┤
//! │ MemoryLedger │        HttpGateway                           │
//! │  (testing)   │   (in `station-gateway-http`)                │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! # Outcomes vs. errors
//!
//! An invocation that reaches the network and is turned away is not a
//! transport failure. The gateway resolves every submitted invocation to a
//! terminal [`InvokeOutcome`]: committed, rejected with the chaincode's
//! reason, or timed out waiting for commit confirmation. [`GatewayError`]
//! is reserved for the cases where no outcome exists at all — the peer was
//! unreachable, the response could not be decoded, the configuration was
//! invalid.
//!
//! # Quick start
//!
//! ```
//! use station_gateway::{ChaincodeCall, InvokeOutcome, LedgerGateway, MemoryLedger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = MemoryLedger::new();
//!
//!     let outcome = ledger.invoke(ChaincodeCall::register("alice", "alice-pub-key")).await?;
//!     assert!(matches!(outcome, InvokeOutcome::Committed { .. }));
//!
//!     let key = ledger.query(ChaincodeCall::get_public_key("alice")).await?;
//!     assert_eq!(&key[..], b"alice-pub-key");
//!     Ok(())
//! }
//! ```

mod call;
mod error;
mod gateway;
mod memory;
mod types;

/// Shared test doubles for gateway consumers.
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;

pub use call::ChaincodeCall;
pub use error::{GatewayError, Result};
pub use gateway::LedgerGateway;
pub use memory::MemoryLedger;
pub use types::{InvokeOutcome, LedgerEntry};
