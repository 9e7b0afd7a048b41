//! Response body shape: `{success: true, data}` or `{success: false, error}`.

use customizer_common::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

/// Error detail; servers send either a bare message or `{code, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireError {
    Message(String),
    Detailed {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl WireError {
    fn message(&self) -> String {
        match self {
            WireError::Message(m) => m.clone(),
            WireError::Detailed { message, code } => message
                .clone()
                .or_else(|| code.clone())
                .unwrap_or_else(|| "unspecified error".to_string()),
        }
    }

    fn code(&self) -> Option<&str> {
        match self {
            WireError::Detailed { code, .. } => code.as_deref(),
            WireError::Message(_) => None,
        }
    }
}

impl WireResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(WireError::Message(message.into())),
        }
    }

    /// Map the body to the caller's result. A missing `data` resolves to null.
    pub fn into_result(self) -> Result<Value, DispatchError> {
        if self.success {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        let Some(error) = self.error else {
            return Err(DispatchError::Rejected("unspecified error".to_string()));
        };
        let message = error.message();
        Err(match error.code() {
            Some("unauthorized" | "forbidden" | "invalid_credential") => {
                DispatchError::Unauthorized(message)
            }
            Some("invalid" | "validation") => DispatchError::Validation(message),
            Some("rate_limited") => DispatchError::RateLimited,
            _ => DispatchError::Rejected(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> WireResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn success_carries_data() {
        let res = parse(json!({"success": true, "data": {"saved": 1}}));
        assert_eq!(res.into_result().unwrap(), json!({"saved": 1}));
    }

    #[test]
    fn success_without_data_is_null() {
        assert_eq!(
            parse(json!({"success": true})).into_result().unwrap(),
            Value::Null
        );
    }

    #[test]
    fn plain_error_message_is_rejection() {
        let err = parse(json!({"success": false, "error": "nope"}))
            .into_result()
            .unwrap_err();
        assert_eq!(err, DispatchError::Rejected("nope".into()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_codes_are_classified() {
        let err = parse(json!({
            "success": false,
            "error": {"code": "forbidden", "message": "stale credential"}
        }))
        .into_result()
        .unwrap_err();
        assert_eq!(err, DispatchError::Unauthorized("stale credential".into()));

        let err = parse(json!({"success": false, "error": {"code": "validation"}}))
            .into_result()
            .unwrap_err();
        assert_eq!(err, DispatchError::Validation("validation".into()));

        let err = parse(json!({
            "success": false,
            "error": {"code": "rate_limited", "message": "slow down"}
        }))
        .into_result()
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn failure_without_detail() {
        assert!(matches!(
            parse(json!({"success": false})).into_result(),
            Err(DispatchError::Rejected(_))
        ));
    }

    #[test]
    fn constructors_serialize_to_wire_shape() {
        assert_eq!(
            serde_json::to_value(WireResponse::ok(json!(7))).unwrap(),
            json!({"success": true, "data": 7})
        );
        assert_eq!(
            serde_json::to_value(WireResponse::err("bad")).unwrap(),
            json!({"success": false, "error": "bad"})
        );
    }
}
