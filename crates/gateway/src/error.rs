//! Gateway error taxonomy.
//!
//! [`GatewayError`] covers the cases where a call produced no outcome at
//! all. Invoke-side rejection and commit timeout are *not* errors — they are
//! terminal [`InvokeOutcome`](crate::InvokeOutcome) variants, because the
//! network answered; it just said no.

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to the ledger.
///
/// Errors preserve their source chain via the `#[source]` attribute, so
/// callers logging the error see the underlying transport failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The peer could not be reached or the request failed in transit.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<BoxError>,
    },

    /// The chaincode reported a query failure (unknown user, bad arguments).
    #[error("chaincode error: {message}")]
    Chaincode {
        /// Message reported by the chaincode.
        message: String,
    },

    /// The peer's response could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<BoxError>,
    },

    /// The gateway was misconfigured.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl GatewayError {
    /// Creates a new `Transport` error with the given message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), source: None }
    }

    /// Creates a new `Transport` error with a message and source error.
    #[must_use]
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Chaincode` error with the given message.
    #[must_use]
    pub fn chaincode(message: impl Into<String>) -> Self {
        Self::Chaincode { message: message.into() }
    }

    /// Creates a new `Decode` error with the given message.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into(), source: None }
    }

    /// Creates a new `Decode` error with a message and source error.
    #[must_use]
    pub fn decode_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Config` error with the given message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
