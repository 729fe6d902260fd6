//! CLI configuration: thin wrapper around `lookprov_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --token, --client-id, ...).

use std::time::Duration;

use lookprov_api::Credentials;
use lookprov_core::ProviderConfig;
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use lookprov_config::{
    Config, SecretKind, config_path, load_config_or_default, parse_base_url, save_config,
    store_secret,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Credentials given directly on the command line or in `LOOKPROV_*`.
fn flag_credentials(global: &GlobalOpts) -> Option<Credentials> {
    if let Some(token) = &global.token {
        return Some(Credentials::Token(SecretString::from(token.clone())));
    }
    match (&global.client_id, &global.client_secret) {
        (Some(client_id), Some(secret)) => Some(Credentials::ApiClient {
            client_id: client_id.clone(),
            client_secret: SecretString::from(secret.clone()),
        }),
        _ => None,
    }
}

/// Build a `ProviderConfig` from the config file, profile, and CLI overrides.
///
/// Flags win over the profile; without a profile the flags alone must name
/// an instance and credentials.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let defaults = &cfg.defaults;

    let Some(profile) = cfg.profiles.get(&profile_name) else {
        // An explicitly named profile must exist.
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.profile_names(),
            });
        }
        let raw_url = global.base_url.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let auth = flag_credentials(global).ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

        let mut config = ProviderConfig::new(parse_base_url(raw_url)?, auth);
        config.tls = lookprov_config::tls_verification(global.insecure || defaults.insecure, None);
        config.timeout = Duration::from_secs(global.timeout.unwrap_or(defaults.timeout));
        return Ok(config);
    };

    let base_url = parse_base_url(global.base_url.as_deref().unwrap_or(&profile.base_url))?;
    let auth = match flag_credentials(global) {
        Some(auth) => auth,
        None => lookprov_config::resolve_credentials(profile, &profile_name)?,
    };

    let mut config = ProviderConfig::new(base_url, auth);
    config.tls = lookprov_config::tls_verification(
        global.insecure || profile.insecure.unwrap_or(defaults.insecure),
        profile.ca_cert.as_deref(),
    );
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );
    Ok(config)
}
