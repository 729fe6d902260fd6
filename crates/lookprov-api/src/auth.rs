use secrecy::SecretString;
use serde::Deserialize;

/// Credentials for authenticating with a Looker instance.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A pre-issued access token, sent as-is.
    Token(SecretString),

    /// API3 client credentials, exchanged for an access token via
    /// `POST /api/4.0/login` when the client is built.
    ApiClient {
        client_id: String,
        client_secret: SecretString,
    },
}

impl Credentials {
    /// Marker describing the flow without exposing secret material.
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::Token(_) => AuthStrategy::Token,
            Self::ApiClient { .. } => AuthStrategy::ApiClient,
        }
    }
}

/// Which authentication flow a set of credentials uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    Token,
    ApiClient,
}

/// Body of a successful `POST /login`.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
