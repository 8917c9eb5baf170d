//! HTTP implementation of the station's ledger gateway.
//!
//! [`HttpGateway`] forwards chaincode queries and invocations to a ledger
//! peer's REST bridge as JSON over HTTP. The bridge owns the heavy parts —
//! proposal signing, ordering, commit events — and reports back either a
//! payload (queries) or a terminal status (invocations).
//!
//! # Commit wait
//!
//! An invocation waits at most [`commit_wait`](HttpGatewayConfig::commit_wait)
//! for the bridge to confirm the commit. When the window elapses the call
//! resolves to [`InvokeOutcome::TimedOut`](station_gateway::InvokeOutcome) —
//! a terminal outcome, not an error — and the gateway stops tracking the
//! transaction. The default window is 30 seconds; tests and emulated
//! deployments shorten it through the config.
//!
//! # Quick start
//!
//! ```no_run
//! use station_gateway::{ChaincodeCall, LedgerGateway};
//! use station_gateway_http::{HttpGateway, HttpGatewayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpGatewayConfig::builder()
//!     .endpoint("http://localhost:7059")
//!     .build()?;
//! let gateway = HttpGateway::new(config)?;
//!
//! let key = gateway.query(ChaincodeCall::get_public_key("alice")).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod transport;

pub use config::{
    HttpGatewayConfig, DEFAULT_CHANNEL, DEFAULT_COMMIT_WAIT, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use http::HttpGateway;
