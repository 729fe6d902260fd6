//! Shared configuration for the lookprov CLI and other hosts.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `lookprov_core::ProviderConfig`. The CLI layers its flag
//! overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use lookprov_api::Credentials;
use lookprov_core::{ProviderConfig, TlsVerification};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Service name under which secrets live in the system keyring.
pub const KEYRING_SERVICE: &str = "lookprov";

/// Environment prefix; `LOOKPROV__DEFAULTS__TIMEOUT=5` sets `defaults.timeout`.
pub const ENV_PREFIX: &str = "LOOKPROV__";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Looker instances.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_owned(),
                available: self.profile_names(),
            })
    }

    /// Comma-separated profile names, `(none)` when empty.
    pub fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    60
}

/// A named Looker instance.
///
/// Authenticate with either an access token or API3 client credentials.
/// A token wins when both resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root, e.g. "https://acme.looker.com:19999/api".
    pub base_url: String,

    /// API3 client id.
    pub client_id: Option<String>,

    /// API3 client secret (plaintext; prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable holding the client secret.
    pub client_secret_env: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable holding the access token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "lookprov", "lookprov").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("lookprov");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (a missing file is fine) layered under `LOOKPROV__*`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Which secret of a profile a keyring entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Token,
    ClientSecret,
}

impl SecretKind {
    pub fn keyring_key(self, profile_name: &str) -> String {
        match self {
            Self::Token => format!("{profile_name}/token"),
            Self::ClientSecret => format!("{profile_name}/client-secret"),
        }
    }
}

/// Resolve credentials from the chain, without CLI flags.
///
/// For each secret: the profile's `*_env` variable, then the system
/// keyring, then the plaintext value in the file.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    if let Some(token) = resolve_secret(
        profile.token_env.as_deref(),
        profile_name,
        SecretKind::Token,
        profile.token.as_deref(),
    ) {
        return Ok(Credentials::Token(token));
    }

    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };
    let client_id = profile.client_id.clone().ok_or_else(no_credentials)?;
    let client_secret = resolve_secret(
        profile.client_secret_env.as_deref(),
        profile_name,
        SecretKind::ClientSecret,
        profile.client_secret.as_deref(),
    )
    .ok_or_else(no_credentials)?;

    Ok(Credentials::ApiClient {
        client_id,
        client_secret,
    })
}

fn resolve_secret(
    env_name: Option<&str>,
    profile_name: &str,
    kind: SecretKind,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Named env var
    if let Some((env_name, val)) = env_name
        .and_then(|name| std::env::var(name).ok().map(|val| (name, val)))
        .filter(|(_, val)| !val.is_empty())
    {
        debug!(env = env_name, ?kind, "secret from environment");
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    match keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_key(profile_name))
        .and_then(|entry| entry.get_password())
    {
        Ok(secret) => {
            debug!(profile = profile_name, ?kind, "secret from keyring");
            return Some(SecretString::from(secret));
        }
        Err(keyring::Error::NoEntry) => {}
        Err(e) => debug!(error = %e, "keyring unavailable"),
    }

    // 3. Plaintext in config
    plaintext
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::from(s.to_owned()))
}

/// Store a profile secret in the system keyring.
pub fn store_secret(
    profile_name: &str,
    kind: SecretKind,
    secret: &SecretString,
) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_key(profile_name))
        .and_then(|entry| entry.set_password(secret.expose_secret()))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation to ProviderConfig ───────────────────────────────────

/// Parse and check a profile's `base_url`.
pub fn parse_base_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// TLS mode from the insecure flag and CA path; insecure wins.
pub fn tls_verification(insecure: bool, ca_cert: Option<&Path>) -> TlsVerification {
    if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = ca_cert {
        TlsVerification::CustomCa(ca_path.to_path_buf())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ProviderConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_provider_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ProviderConfig, ConfigError> {
    let base_url = parse_base_url(&profile.base_url)?;
    let auth = resolve_credentials(profile, profile_name)?;

    let mut config = ProviderConfig::new(base_url, auth);
    config.tls = tls_verification(
        profile.insecure.unwrap_or(defaults.insecure),
        profile.ca_cert.as_deref(),
    );
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}
