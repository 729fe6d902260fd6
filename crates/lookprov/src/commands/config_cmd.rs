//! Config subcommand handlers.

use dialoguer::Password;
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat, SecretArg};
use crate::config::{self, Config, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const MASK: &str = "****";

/// Copy of the config with every plaintext secret masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
        if profile.client_secret.is_some() {
            profile.client_secret = Some(MASK.into());
        }
    }
    cfg
}

fn render_config(format: OutputFormat, cfg: &Config) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(cfg)
            .map_err(|e| CliError::Internal(format!("cannot render config: {e}"))),
        structured => Ok(output::render_single(structured, cfg, |_| "config".into())),
    }
}

fn save(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

impl From<SecretArg> for SecretKind {
    fn from(arg: SecretArg) -> Self {
        match arg {
            SecretArg::Token => Self::Token,
            SecretArg::ClientSecret => Self::ClientSecret,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let base_url = global.base_url.clone().ok_or_else(|| CliError::Validation {
                field: "base_url".into(),
                reason: "pass --base-url (or set LOOKPROV_BASE_URL) to initialise a profile".into(),
            })?;
            config::parse_base_url(&base_url)?;

            let mut cfg = config::load_config_or_default();
            let profile_name = global.profile.clone().unwrap_or_else(|| "default".into());
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            profile.base_url = base_url;
            if global.client_id.is_some() {
                profile.client_id.clone_from(&global.client_id);
            }
            cfg.default_profile = Some(profile_name.clone());
            save(&cfg)?;

            if !global.quiet {
                eprintln!("Configuration written to {}", config::config_path().display());
                eprintln!("  Active profile: {profile_name}");
                eprintln!("  Store a secret with: lookprov config set-secret client-secret");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            output::print_output(&render_config(global.output, &cfg)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let lines: Vec<String> = cfg
                .profiles
                .iter()
                .map(|(name, p)| {
                    let marker = if *name == active { "*" } else { " " };
                    format!("{marker} {name}\t{}", p.base_url)
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: cfg.profile_names(),
                });
            }
            cfg.default_profile = Some(name.clone());
            save(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetSecret { kind } => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let kind = SecretKind::from(kind);
            let label = match kind {
                SecretKind::Token => "Access token",
                SecretKind::ClientSecret => "Client secret",
            };

            let secret: String = Password::new()
                .with_prompt(format!("{label} for profile '{profile_name}'"))
                .interact()
                .map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "cannot be empty".into(),
                });
            }

            config::store_secret(&profile_name, kind, &SecretString::from(secret))?;
            if !global.quiet {
                eprintln!("{label} stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use lookprov_config::Profile;

    #[test]
    fn show_masks_plaintext_secrets() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                base_url: "https://acme.looker.com/api".into(),
                client_id: Some("abc".into()),
                client_secret: Some("hunter2".into()),
                ..Profile::default()
            },
        );

        let out = render_config(OutputFormat::Table, &redacted(&cfg)).unwrap();
        assert!(!out.contains("hunter2"));
        assert!(out.contains("client_id = \"abc\""));
        assert!(out.contains(MASK));
    }
}
