//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use lookprov_config::ConfigError;
use lookprov_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Looker at {url}")]
    #[diagnostic(
        code(lookprov::connection_failed),
        help(
            "Check that the instance is reachable and that base_url points at the API root\n\
             (usually https://<host>:19999/api or https://<host>/api).\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(lookprov::auth_failed),
        help(
            "Verify the API3 client id and secret, or the access token.\n\
             Store a secret with: lookprov config set-secret client-secret"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(lookprov::no_credentials),
        help(
            "Pass --token, or --client-id with --client-secret.\n\
             Or set LOOKPROV_TOKEN / LOOKPROV_CLIENT_SECRET, or run: lookprov config set-secret"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lookprov::not_found),
        help("Run: lookprov {list_command}")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} cannot be updated in place")]
    #[diagnostic(code(lookprov::update_not_supported), help("{reason}"))]
    UpdateNotSupported {
        resource_type: String,
        reason: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(lookprov::api_error))]
    ApiError {
        status: String,
        message: String,
        #[help]
        details: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lookprov::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lookprov::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lookprov --profile {name} --base-url <url> config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No Looker instance configured")]
    #[diagnostic(
        code(lookprov::no_config),
        help(
            "Pass --base-url, or create a profile with: lookprov --base-url <url> config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(lookprov::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(lookprov::keyring),
        help("Use the *_env profile keys or plaintext secrets when no system keyring is available.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(lookprov::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout / cancellation ───────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(lookprov::timeout),
        help("Increase timeout with --timeout or check instance responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Interrupted")]
    #[diagnostic(code(lookprov::interrupted))]
    Interrupted,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(lookprov::json), help("Check the file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    #[diagnostic(code(lookprov::toml), help("Check the file contents and try again."))]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(lookprov::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::UpdateNotSupported { .. } => exit_code::UNSUPPORTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Interrupted => exit_code::INTERRUPTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command(resource_type: &str) -> String {
    match resource_type {
        "folder" => "folder list".into(),
        "model set" => "model-set list".into(),
        "api credential" => "api-credential list --user-id <user_id>".into(),
        _ => "schema".into(),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Cancelled => CliError::Interrupted,

            CoreError::NotFound {
                resource_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command(&resource_type),
                resource_type,
                identifier,
            },

            CoreError::Validation {
                field,
                value,
                constraint,
            } => CliError::Validation {
                field,
                reason: format!("{constraint} (was {value})"),
            },

            CoreError::UpdateNotSupported {
                resource_type,
                reason,
            } => CliError::UpdateNotSupported {
                resource_type,
                reason,
            },

            CoreError::Api {
                status,
                message,
                details,
            } => CliError::ApiError {
                status: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
                details: (!details.is_empty()).then(|| details.join("\n")),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Keyring(message) => CliError::Keyring { message },
            ConfigError::Serialization(e) => CliError::Internal(format!("cannot write config: {e}")),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_exit_as_usage_errors() {
        let err: CliError = CoreError::Validation {
            field: "embed_config.embed_cookieless_v2".into(),
            value: "true".into(),
            constraint: "cannot be set to true when embed_config.embed_enabled is false".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            err.to_string(),
            "Invalid value for embed_config.embed_cookieless_v2: cannot be set to true when \
             embed_config.embed_enabled is false (was true)"
        );
    }

    #[test]
    fn not_found_points_at_list_command() {
        let err: CliError = CoreError::NotFound {
            resource_type: "model set".into(),
            identifier: "77".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(err, CliError::NotFound { ref list_command, .. } if list_command == "model-set list"));
    }

    #[test]
    fn cancellation_maps_to_interrupt_code() {
        assert_eq!(CliError::from(CoreError::Cancelled).exit_code(), 130);
    }
}
