//! HTTP error taxonomy for the station's REST surface.
//!
//! Callers see exactly two status codes: 400 for requests the station
//! refuses to forward (malformed body, key mismatch) and 500 for anything
//! the ledger side got wrong. Gateway failures surface their message
//! verbatim in the body so operators can see the peer's reason without
//! tailing the node's logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use station_gateway::{GatewayError, InvokeOutcome};
use thiserror::Error;

/// An error on the REST surface, mapped to a status code on the way out.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is missing or malformed. 400.
    #[error("{0}")]
    Validation(String),

    /// The supplied key does not match the registered one. 400.
    #[error("{0}")]
    Authorization(String),

    /// The gateway reported a failure. 500, message verbatim.
    #[error("{0}")]
    Gateway(String),
}

impl ApiError {
    /// A 400 for a request the station refuses to parse or forward.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// A 400 for a key that does not match the registered one.
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// A 500 carrying the gateway's message verbatim.
    #[must_use]
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway(message.into())
    }

    /// Converts a non-committed invocation outcome into the 500 the caller
    /// sees. Must not be called with a committed outcome.
    #[must_use]
    pub fn from_outcome(outcome: &InvokeOutcome) -> Self {
        debug_assert!(!outcome.is_committed());
        Self::Gateway(outcome.to_string())
    }

    /// Status code this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Authorization(_) => StatusCode::BAD_REQUEST,
            Self::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_authorization_are_bad_request() {
        assert_eq!(ApiError::validation("missing uniqueId").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::authorization("key mismatch").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn gateway_is_internal_server_error() {
        assert_eq!(ApiError::gateway("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn gateway_error_message_survives_verbatim() {
        let err = ApiError::from(GatewayError::chaincode("userId not found"));
        assert_eq!(err.to_string(), "chaincode error: userId not found");
    }

    #[test]
    fn outcome_conversion_carries_the_reason() {
        let err = ApiError::from_outcome(&InvokeOutcome::Rejected {
            reason: "the entry [u1] has already been committed".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("already been committed"));
    }
}
