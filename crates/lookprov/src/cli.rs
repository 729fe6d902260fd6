//! Clap derive structures for the `lookprov` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lookprov -- declarative management of Looker instances
#[derive(Debug, Parser)]
#[command(
    name = "lookprov",
    version,
    about = "Manage Looker folders, model sets, API credentials and settings",
    long_about = "Drives the Looker provider resource modules from the command line.\n\n\
        Settings are reconciled from a desired-state file: `setting plan` shows\n\
        what would change, `setting apply` sends a single PATCH.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Instance profile to use
    #[arg(long, short = 'p', env = "LOOKPROV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. https://acme.looker.com:19999/api (overrides profile)
    #[arg(long, env = "LOOKPROV_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API3 client id
    #[arg(long, env = "LOOKPROV_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// API3 client secret
    #[arg(long, env = "LOOKPROV_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Pre-issued access token (takes priority over client credentials)
    #[arg(long, env = "LOOKPROV_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LOOKPROV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "LOOKPROV_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LOOKPROV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile instance-wide settings
    #[command(alias = "settings")]
    Setting(SettingArgs),

    /// Manage and look up folders
    #[command(alias = "folders")]
    Folder(FolderArgs),

    /// Manage model sets
    #[command(alias = "model-sets", alias = "ms")]
    ModelSet(ModelSetArgs),

    /// Issue and revoke API3 credentials
    #[command(alias = "api-credentials", alias = "cred")]
    ApiCredential(ApiCredentialArgs),

    /// Show attribute schemas of resource types
    Schema(SchemaArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page size requested from the server; all pages are fetched
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Comma-separated field projection
    #[arg(long)]
    pub fields: Option<String>,

    /// Endpoint filter as key=value (repeatable)
    #[arg(long, short = 'f', value_parser = parse_key_value)]
    pub filter: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

// ── Setting ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingArgs {
    #[command(subcommand)]
    pub command: SettingCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingCommand {
    /// Show the current settings aggregate
    Show,

    /// Show what `apply` would change, without writing
    Plan {
        /// Desired settings file (TOML, or JSON with a .json extension)
        file: PathBuf,
    },

    /// Reconcile the instance with a desired settings file
    Apply {
        /// Desired settings file (TOML, or JSON with a .json extension)
        file: PathBuf,
    },

    /// Stop tracking settings (the instance keeps its values)
    Delete,
}

// ── Folder ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Resolve a folder by id or exact name
    #[command(group(ArgGroup::new("key").required(true).args(["id", "name"])))]
    Lookup {
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// List folders
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one folder
    Show { id: String },

    /// Create a folder
    Create {
        #[arg(long)]
        name: String,

        /// Parent folder id
        #[arg(long)]
        parent_id: String,
    },

    /// Rename or move a folder
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        parent_id: Option<String>,
    },

    /// Delete a folder
    Delete { id: String },
}

// ── Model set ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModelSetArgs {
    #[command(subcommand)]
    pub command: ModelSetCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModelSetCommand {
    /// List model sets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one model set
    Show { id: String },

    /// Create a model set
    Create {
        #[arg(long)]
        name: String,

        /// LookML model name (repeatable)
        #[arg(long = "model", short = 'm', required = true)]
        models: Vec<String>,
    },

    /// Rename a model set or replace its models
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// LookML model name (repeatable); replaces the whole set
        #[arg(long = "model", short = 'm')]
        models: Vec<String>,
    },

    /// Delete a model set
    Delete { id: String },
}

// ── API credential ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApiCredentialArgs {
    #[command(subcommand)]
    pub command: ApiCredentialCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApiCredentialCommand {
    /// List a user's credentials
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        user_id: String,
    },

    /// Show one credential
    Show {
        /// <user_id>/<credential_id>
        id: String,
    },

    /// Issue a credential; the secret is printed once
    Create {
        #[arg(long)]
        user_id: String,

        /// Credential type
        #[arg(long = "type", default_value = "api3")]
        credential_type: String,

        /// Create the credential disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Revoke a credential
    Delete {
        /// <user_id>/<credential_id>
        id: String,
    },
}

// ── Schema ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. looker_setting (omit to list all types)
    pub type_name: Option<String>,

    /// Show the data source rather than the resource of that name
    #[arg(long)]
    pub data_source: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Save --base-url (and --client-id) as the --profile profile and make
    /// it the default
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use { name: String },

    /// Store a secret for the active profile in the system keyring
    SetSecret {
        #[arg(value_enum)]
        kind: SecretArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecretArg {
    Token,
    ClientSecret,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_requires_exactly_one_key() {
        assert!(Cli::try_parse_from(["lookprov", "folder", "lookup"]).is_err());
        assert!(
            Cli::try_parse_from(["lookprov", "folder", "lookup", "--id", "1", "--name", "x"]).is_err()
        );
        assert!(Cli::try_parse_from(["lookprov", "folder", "lookup", "--name", "x"]).is_ok());
    }

    #[test]
    fn filters_parse_as_pairs() {
        let cli = Cli::try_parse_from(["lookprov", "folder", "list", "-f", "parent_id=1"]).unwrap();
        match cli.command {
            Command::Folder(FolderArgs {
                command: FolderCommand::List(list),
            }) => assert_eq!(list.filter, vec![("parent_id".to_owned(), "1".to_owned())]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_key_value("=1").is_err());
    }
}
