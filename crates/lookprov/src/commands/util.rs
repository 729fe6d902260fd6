//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use lookprov_api::ListOptions;
use lookprov_core::DesiredSettings;

use crate::cli::ListArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read a desired-settings file. `.json` files are JSON, anything else TOML.
pub fn read_desired(path: &Path) -> Result<DesiredSettings, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let doc: serde_json::Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };
    Ok(DesiredSettings::from_json(&doc)?)
}

pub fn list_options(args: &ListArgs) -> ListOptions {
    ListOptions {
        limit: args.limit,
        offset: None,
        fields: args.fields.clone(),
        filters: args.filter.clone(),
    }
}
