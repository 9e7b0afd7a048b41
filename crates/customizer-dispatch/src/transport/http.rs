//! reqwest-backed transport posting envelopes to one endpoint.

use std::time::Duration;

use async_trait::async_trait;
use customizer_common::DispatchError;
use customizer_config::EndpointConfig;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{Envelope, Transport, WireResponse};

/// Longest server message kept in an error.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpTransport {
    url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// The per-attempt timeout is enforced by the dispatcher, not here.
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self, DispatchError> {
        Self::new(
            config.url.clone(),
            Duration::from_millis(config.connect_timeout_ms),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, envelope: &Envelope) -> Result<Value, DispatchError> {
        debug!(action = %envelope.action, url = %self.url, "posting update");

        let response = self
            .http
            .post(&self.url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout
                } else {
                    DispatchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Protocol(e.to_string()))?;
        body.into_result()
    }
}

/// Classify a non-2xx response.
pub(crate) fn status_error(status: StatusCode, body: &str) -> DispatchError {
    let message = body.chars().take(MAX_ERROR_BODY).collect::<String>();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DispatchError::Unauthorized(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DispatchError::Validation(message)
        }
        StatusCode::TOO_MANY_REQUESTS => DispatchError::RateLimited,
        StatusCode::REQUEST_TIMEOUT => DispatchError::Timeout,
        _ => DispatchError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
