//! Configuration for the HTTP ledger gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use station_gateway::GatewayError;

/// Default per-request timeout for queries (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default commit-confirmation wait for invocations (30 seconds).
pub const DEFAULT_COMMIT_WAIT: Duration = Duration::from_secs(30);

/// Default ledger channel.
pub const DEFAULT_CHANNEL: &str = "mychannel";

/// Configuration for [`HttpGateway`](crate::HttpGateway).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use station_gateway_http::HttpGatewayConfig;
///
/// let config = HttpGatewayConfig::builder()
///     .endpoint("http://localhost:7059")
///     .commit_wait(Duration::from_secs(3))
///     .build()?;
/// # Ok::<(), station_gateway::GatewayError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpGatewayConfig {
    /// Base URL of the peer's REST bridge.
    pub(crate) endpoint: String,

    /// Ledger channel all calls are scoped to.
    #[serde(default = "default_channel")]
    pub(crate) channel: String,

    /// Per-request timeout for queries.
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub(crate) request_timeout: Duration,

    /// Connection timeout.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub(crate) connect_timeout: Duration,

    /// How long an invocation waits for commit confirmation before
    /// resolving to a timed-out outcome.
    #[serde(with = "humantime_serde", default = "default_commit_wait")]
    pub(crate) commit_wait: Duration,
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_owned()
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_commit_wait() -> Duration {
    DEFAULT_COMMIT_WAIT
}

#[bon::bon]
impl HttpGatewayConfig {
    /// Creates a new configuration, validating all required fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if:
    /// - `endpoint` is empty
    /// - `commit_wait` is zero
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: String,
        channel: Option<String>,
        #[builder(default = DEFAULT_REQUEST_TIMEOUT)] request_timeout: Duration,
        #[builder(default = DEFAULT_CONNECT_TIMEOUT)] connect_timeout: Duration,
        #[builder(default = DEFAULT_COMMIT_WAIT)] commit_wait: Duration,
    ) -> Result<Self, GatewayError> {
        if endpoint.trim().is_empty() {
            return Err(GatewayError::config("endpoint cannot be empty"));
        }
        if commit_wait.is_zero() {
            return Err(GatewayError::config("commit_wait must be positive"));
        }

        Ok(Self {
            endpoint,
            channel: channel.unwrap_or_else(default_channel),
            request_timeout,
            connect_timeout,
            commit_wait,
        })
    }

    /// Returns the bridge endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the ledger channel.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Returns the per-request timeout for queries.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the connection timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the commit-confirmation wait window.
    #[must_use]
    pub fn commit_wait(&self) -> Duration {
        self.commit_wait
    }
}
