//! Remote persistence endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where settings are persisted and with which credential.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Single logical endpoint accepting `{action, payload, credentialToken}`.
    pub url: String,
    /// Opaque credential issued by the host platform's session.
    pub credential_token: String,
    /// TCP connect timeout in milliseconds (valid range: 100-60000).
    pub connect_timeout_ms: u64,
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field(
                "credential_token",
                &if self.credential_token.is_empty() {
                    ""
                } else {
                    "[REDACTED]"
                },
            )
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/admin/settings".to_string(),
            credential_token: String::new(),
            connect_timeout_ms: 10_000,
        }
    }
}
