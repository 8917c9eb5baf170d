//! The HTTP gateway implementation.

use async_trait::async_trait;
use bytes::Bytes;
use station_gateway::{ChaincodeCall, GatewayError, InvokeOutcome, LedgerGateway, Result};

use crate::{
    config::HttpGatewayConfig,
    transport::{WireChaincodeRequest, WireErrorResponse, WireInvokeResponse, WireQueryResponse},
};

/// Ledger gateway backed by a peer REST bridge.
///
/// # Thread safety
///
/// `HttpGateway` is `Send + Sync` and cheap to clone; the underlying
/// `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: HttpGatewayConfig,
}

impl HttpGateway {
    /// Creates a gateway from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the HTTP client cannot be built.
    pub fn new(config: HttpGatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| GatewayError::config(format!("http client build failed: {e}")))?;

        Ok(Self { client, config })
    }

    fn call_url(&self, call: &ChaincodeCall, action: &str) -> String {
        format!(
            "{}/channels/{}/chaincodes/{}/{action}",
            self.config.endpoint().trim_end_matches('/'),
            self.config.channel(),
            call.chaincode,
        )
    }

    /// Maps a non-2xx bridge response to a gateway error.
    ///
    /// Client-class statuses carry the chaincode's own failure message;
    /// everything else is a transport-level problem.
    async fn error_from_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let message = match response.json::<WireErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("bridge returned status {status}"),
        };

        if status.is_client_error() {
            GatewayError::chaincode(message)
        } else {
            GatewayError::transport(message)
        }
    }

    async fn send_invoke(&self, call: &ChaincodeCall) -> Result<InvokeOutcome> {
        let response = self
            .client
            .post(self.call_url(call, "invoke"))
            .json(&WireChaincodeRequest::from(call))
            .send()
            .await
            .map_err(|e| GatewayError::transport_with_source(format!("invoke rpc failed: {e}"), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<WireErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("bridge returned status {status}"),
            };
            // A client-class refusal is the network saying no: a terminal
            // rejection, not a transport failure.
            if status.is_client_error() {
                return Ok(InvokeOutcome::Rejected { reason: message });
            }
            return Err(GatewayError::transport(message));
        }

        let wire: WireInvokeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::decode_with_source(format!("invoke decode failed: {e}"), e))?;

        InvokeOutcome::try_from(wire)
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    async fn query(&self, call: ChaincodeCall) -> Result<Bytes> {
        let response = self
            .client
            .post(self.call_url(&call, "query"))
            .timeout(self.config.request_timeout())
            .json(&WireChaincodeRequest::from(&call))
            .send()
            .await
            .map_err(|e| GatewayError::transport_with_source(format!("query rpc failed: {e}"), e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let wire: WireQueryResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::decode_with_source(format!("query decode failed: {e}"), e))?;

        Ok(Bytes::from(wire.payload))
    }

    async fn invoke(&self, call: ChaincodeCall) -> Result<InvokeOutcome> {
        // The commit wait is a hard window: when it elapses, the call
        // resolves to a terminal timed-out outcome and the transaction is
        // no longer tracked, whether or not it commits later.
        match tokio::time::timeout(self.config.commit_wait(), self.send_invoke(&call)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    call = %call,
                    commit_wait = ?self.config.commit_wait(),
                    "no commit confirmation within the wait window",
                );
                Ok(InvokeOutcome::TimedOut)
            },
        }
    }
}
