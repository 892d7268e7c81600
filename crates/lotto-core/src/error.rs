// ── Core error types ──
//
// User-facing errors from lotto-core. Consumers never see raw HTTP
// plumbing; the `From<lotto_api::Error>` impl translates transport-layer
// failures into domain variants.

use thiserror::Error;

use crate::cart::CartError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the lotto API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- sign in again")]
    SessionExpired,

    #[error("Not signed in")]
    NotAuthenticated,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The server refused a well-formed request (closed slot, quota, ...).
    #[error("Rejected by server: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error(transparent)]
    Cart(#[from] CartError),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether signing in again could clear this error.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::SessionExpired | Self::NotAuthenticated
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lotto_api::Error> for CoreError {
    fn from(err: lotto_api::Error) -> Self {
        match err {
            lotto_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            lotto_api::Error::SessionExpired => CoreError::SessionExpired,
            lotto_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map(ToString::to_string).unwrap_or_default(),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            lotto_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lotto_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lotto_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            lotto_api::Error::Api {
                status, message, ..
            } if (400..500).contains(&status) => CoreError::Rejected { message },
            lotto_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            lotto_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_become_rejections() {
        let err = CoreError::from(lotto_api::Error::Api {
            message: "Slot is closed".into(),
            code: Some("Bad Request".into()),
            status: 400,
        });
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "Slot is closed"));
    }

    #[test]
    fn server_errors_keep_status() {
        let err = CoreError::from(lotto_api::Error::Api {
            message: "boom".into(),
            code: None,
            status: 502,
        });
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
    }

    #[test]
    fn expired_session_is_auth() {
        assert!(CoreError::from(lotto_api::Error::SessionExpired).is_auth());
    }
}
