// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Looker instance. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds a `ProviderConfig` from a profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use lookprov_api::{Credentials, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-hosted instances on self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single Looker instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API root, e.g. `https://acme.looker.com:19999/api`.
    pub base_url: Url,
    /// Access token or API3 client id/secret.
    pub auth: Credentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(base_url: Url, auth: Credentials) -> Self {
        Self {
            base_url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(60),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
