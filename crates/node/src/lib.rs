//! The station node: an HTTP front-end over the ledger gateway.
//!
//! The node accepts user registrations and chronicle entries over REST and
//! forwards them through a [`LedgerGateway`](station_gateway::LedgerGateway).
//! Its one piece of real machinery is the offline subsystem: while the
//! station is marked disconnected, entry writes are buffered in the
//! [`Backlog`](backlog::Backlog) instead of being submitted, and the moment
//! connectivity returns they are drained and replayed through the gateway in
//! the background.
//!
//! # Write path
//!
//! ```text
//!              ┌───────────────┐   connected    ┌────────────────┐
//! POST entry → │ validate +    │ ─────────────→ │ LedgerGateway  │
//!              │ key check     │                │ chronicle.record│
//!              └───────────────┘                └────────────────┘
//!                      │ disconnected                  ↑
//!                      ▼                               │ replay on
//!              ┌───────────────┐   drain_and_reset     │ reconnect
//!              │    Backlog    │ ──────────────────────┘
//!              └───────────────┘
//! ```
//!
//! # Limitations
//!
//! - The backlog is in-memory only; buffered entries do not survive a
//!   process restart.
//! - The disconnected flag is not persisted either; the node always starts
//!   connected.
//! - Replay is at-most-once: a record whose resubmission fails is logged
//!   and dropped, never re-buffered.

pub mod backlog;
pub mod connectivity;
pub mod error;
pub mod handlers;
pub mod replay;

pub use backlog::{Backlog, BacklogRecord};
pub use connectivity::{ConnectivityState, Transition};
pub use error::ApiError;
pub use handlers::{router, AppState};
pub use replay::{spawn_replay, ReplayStats};
