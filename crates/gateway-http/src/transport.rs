//! Wire types for the peer REST bridge.
//!
//! These mirror structs keep the JSON contract in one place and convert to
//! and from the gateway's own types at the edges.

use serde::{Deserialize, Serialize};
use station_gateway::{ChaincodeCall, GatewayError, InvokeOutcome};

/// Request body sent to both the query and invoke endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct WireChaincodeRequest {
    pub(crate) function: String,
    pub(crate) args: Vec<String>,
}

impl From<&ChaincodeCall> for WireChaincodeRequest {
    fn from(call: &ChaincodeCall) -> Self {
        Self { function: call.function.clone(), args: call.args.clone() }
    }
}

/// Successful query response.
#[derive(Debug, Deserialize)]
pub(crate) struct WireQueryResponse {
    pub(crate) payload: String,
}

/// Error body the bridge returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorResponse {
    pub(crate) error: String,
}

/// Invocation response.
#[derive(Debug, Deserialize)]
pub(crate) struct WireInvokeResponse {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) tx_id: Option<String>,
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

impl TryFrom<WireInvokeResponse> for InvokeOutcome {
    type Error = GatewayError;

    fn try_from(wire: WireInvokeResponse) -> Result<Self, Self::Error> {
        match wire.status.as_str() {
            "COMMITTED" => Ok(InvokeOutcome::Committed {
                tx_id: wire.tx_id.unwrap_or_default(),
            }),
            "REJECTED" => Ok(InvokeOutcome::Rejected {
                reason: wire.reason.unwrap_or_else(|| "rejected by peer".to_owned()),
            }),
            "TIMED_OUT" | "TIMEOUT" => Ok(InvokeOutcome::TimedOut),
            other => Err(GatewayError::decode(format!("unknown invoke status \"{other}\""))),
        }
    }
}
