//! The seam between the dispatcher and the remote persistence endpoint.

mod http;
mod wire;

pub use http::HttpTransport;
pub use wire::{WireError, WireResponse};

use async_trait::async_trait;
use customizer_common::DispatchError;
use serde::Serialize;
use serde_json::Value;

/// Body sent for every request: `{action, payload, credentialToken}`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub action: String,
    pub payload: Value,
    pub credential_token: String,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("action", &self.action)
            .field("payload", &self.payload)
            .field("credential_token", &"[REDACTED]")
            .finish()
    }
}

/// Performs one remote call. Errors carry their retry classification via
/// [`DispatchError::is_retryable`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, envelope: &Envelope) -> Result<Value, DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_camel_case() {
        let envelope = Envelope {
            action: "save_setting".into(),
            payload: json!({"accent_color": "#0af"}),
            credential_token: "tok".into(),
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "action": "save_setting",
                "payload": {"accent_color": "#0af"},
                "credentialToken": "tok"
            })
        );
    }

    #[test]
    fn envelope_debug_hides_token() {
        let envelope = Envelope {
            action: "save_setting".into(),
            payload: json!(null),
            credential_token: "very-secret".into(),
        };
        let debug = format!("{envelope:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
