use thiserror::Error;

/// One entry of the `errors` array in a Looker error body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = self.field.as_deref().unwrap_or("<body>");
        match (&self.code, &self.message) {
            (Some(code), Some(msg)) => write!(f, "{field}: {msg} ({code})"),
            (None, Some(msg)) => write!(f, "{field}: {msg}"),
            (Some(code), None) => write!(f, "{field}: {code}"),
            (None, None) => write!(f, "{field}: invalid"),
        }
    }
}

/// Top-level error type for the `lookprov-api` crate.
///
/// Transport failures (the request never produced an HTTP response) are kept
/// apart from API failures (a response arrived with a non-2xx status).
/// `lookprov-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the token was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The caller's cancellation token fired before the response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response with the decoded Looker error payload.
    #[error("Looker API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
        documentation_url: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of an API error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" answer from the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the token was missing, expired, or rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication { .. }) || self.status() == Some(401)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this crate retries; the host runtime owns that policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Per-field validation messages from a 422 body, flattened to strings.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            Self::Api { errors, .. } => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}
