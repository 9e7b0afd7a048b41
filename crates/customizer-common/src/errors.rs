use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure of one remote-persistence operation.
///
/// Cloned once per observer when several callers share a deduplicated
/// request, so every variant carries owned, cheap data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Protocol(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<DispatchError>,
    },
}

impl DispatchError {
    /// Transient failures worth another attempt after a backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Network(_) | DispatchError::Timeout | DispatchError::RateLimited => true,
            DispatchError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CustomizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("dispatch.max_retries = 99".into());
        assert_eq!(
            err.to_string(),
            "config validation error: dispatch.max_retries = 99"
        );
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(DispatchError::Network("connection reset".into()).is_retryable());
        assert!(DispatchError::Timeout.is_retryable());
        assert!(DispatchError::RateLimited.is_retryable());
        assert!(DispatchError::Server {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
    }

    #[test]
    fn terminal_errors_are_not_retryable() {
        assert!(!DispatchError::Unauthorized("bad token".into()).is_retryable());
        assert!(!DispatchError::Validation("unknown key".into()).is_retryable());
        assert!(!DispatchError::Rejected("nope".into()).is_retryable());
        assert!(!DispatchError::Cancelled.is_retryable());
        assert!(!DispatchError::Protocol("not json".into()).is_retryable());
        assert!(!DispatchError::Server {
            status: 404,
            message: "missing".into()
        }
        .is_retryable());
    }

    #[test]
    fn exhausted_is_terminal_and_names_last_error() {
        let err = DispatchError::Exhausted {
            attempts: 4,
            last: Box::new(DispatchError::Timeout),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "gave up after 4 attempts: request timed out");
    }

    #[test]
    fn customizer_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: CustomizerError = config_err.into();
        assert!(matches!(err, CustomizerError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn customizer_error_from_dispatch() {
        let err: CustomizerError = DispatchError::Cancelled.into();
        assert!(matches!(err, CustomizerError::Dispatch(DispatchError::Cancelled)));
        assert_eq!(err.to_string(), "request cancelled");
    }

    #[test]
    fn customizer_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CustomizerError = io_err.into();
        assert!(matches!(err, CustomizerError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
