// ── Core error types ──
//
// User-facing errors from lookprov-core. Consumers see resource-level
// outcomes (not found, validation, update refused) rather than raw HTTP.
// The `From<lookprov_api::Error>` impl translates transport-layer errors
// into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Looker at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{resource_type} not found: {identifier}")]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// A locally detected constraint violation. Raised before any network
    /// write.
    #[error("{field} {constraint} (was {value})")]
    Validation {
        field: String,
        value: String,
        constraint: String,
    },

    #[error("{resource_type} cannot be updated in place: {reason}")]
    UpdateNotSupported {
        resource_type: String,
        reason: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Looker API error{}: {message}", status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
        /// Per-field messages and documentation links from the error body.
        details: Vec<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(resource_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    pub(crate) fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lookprov_api::Error> for CoreError {
    fn from(err: lookprov_api::Error) -> Self {
        match err {
            lookprov_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            lookprov_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            lookprov_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lookprov_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            lookprov_api::Error::Cancelled => CoreError::Cancelled,
            lookprov_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lookprov_api::Error::Api { status: 401, message, .. } => {
                CoreError::AuthenticationFailed { message }
            }
            lookprov_api::Error::Api { status: 404, message, .. } => CoreError::NotFound {
                resource_type: "resource".into(),
                identifier: message,
            },
            lookprov_api::Error::Api {
                status,
                message,
                errors,
                documentation_url,
            } => {
                let mut details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                details.extend(documentation_url.map(|url| format!("see {url}")));
                CoreError::Api {
                    status: Some(status),
                    message,
                    details,
                }
            }
            lookprov_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
