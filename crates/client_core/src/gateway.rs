//! Outbound calls to the transparency backend.
//!
//! Every failure, whether the request never got a response, the backend
//! answered with a non-success status, or a success body broke the endpoint's
//! contract, comes back as a [`GatewayError`]. The gateway never retries.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    error::{ContractViolation, ErrorBody},
    protocol::{Endpoint, Method},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Could not reach the transparency service. Check your connection and try again.";
pub const INVALID_RESPONSE_MESSAGE: &str =
    "The transparency service returned an unexpected response. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("request to {endpoint} failed before a response arrived: {reason}")]
    Transport { endpoint: String, reason: String },
    #[error("request to {endpoint} failed with status {status}: {message}")]
    Application {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
    #[error("could not encode request for {endpoint}: {reason}")]
    InvalidRequest { endpoint: String, reason: String },
}

impl GatewayError {
    /// Text suitable for showing to the user in place of the missing data.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => TRANSPORT_FAILURE_MESSAGE.to_string(),
            Self::Application { message, .. } => message.clone(),
            Self::InvalidResponse { .. } | Self::InvalidRequest { .. } => {
                INVALID_RESPONSE_MESSAGE.to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn contract_violation(endpoint: &Endpoint, violation: ContractViolation) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.path(),
            reason: violation.to_string(),
        }
    }
}

#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Sends `payload` to `endpoint` and returns the parsed success body.
    /// `payload` is ignored for GET endpoints.
    async fn invoke(&self, endpoint: &Endpoint, payload: Value) -> Result<Value, GatewayError>;
}

/// Typed wrapper over [`RequestGateway::invoke`].
pub async fn call<Req, Resp>(
    gateway: &dyn RequestGateway,
    endpoint: &Endpoint,
    request: &Req,
) -> Result<Resp, GatewayError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let payload = serde_json::to_value(request).map_err(|err| GatewayError::InvalidRequest {
        endpoint: endpoint.path(),
        reason: err.to_string(),
    })?;
    let body = gateway.invoke(endpoint, payload).await?;
    serde_json::from_value(body).map_err(|err| GatewayError::InvalidResponse {
        endpoint: endpoint.path(),
        reason: err.to_string(),
    })
}

pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        Url::parse(base_url).with_context(|| format!("invalid API base url '{base_url}'"))?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn invoke(&self, endpoint: &Endpoint, payload: Value) -> Result<Value, GatewayError> {
        let path = endpoint.path();
        let url = self.url_for(endpoint);
        debug!(endpoint = %path, "gateway: sending request");

        let request = match endpoint.method() {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url).json(&payload),
        };
        let response = request.send().await.map_err(|err| {
            let reason = if err.is_timeout() {
                "request timed out".to_string()
            } else {
                err.to_string()
            };
            warn!(endpoint = %path, %reason, "gateway: transport failure");
            GatewayError::Transport {
                endpoint: path.clone(),
                reason,
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport {
                endpoint: path.clone(),
                reason: err.to_string(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message())
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!(endpoint = %path, status = status.as_u16(), %message, "gateway: request rejected");
            return Err(GatewayError::Application {
                endpoint: path,
                status: status.as_u16(),
                message,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(GatewayError::InvalidResponse {
                endpoint: path,
                reason: "empty response body".to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(|err| GatewayError::InvalidResponse {
            endpoint: path,
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
