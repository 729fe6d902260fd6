//! Command handlers, one module per resource family.

pub mod api_credential;
pub mod config_cmd;
pub mod folder;
pub mod model_set;
pub mod schema;
pub mod setting;
mod util;

use tokio_util::sync::CancellationToken;

use lookprov_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a connected command to its handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    match cmd {
        Command::Setting(args) => setting::handle(provider, args, global, cancel).await,
        Command::Folder(args) => folder::handle(provider, args, global, cancel).await,
        Command::ModelSet(args) => model_set::handle(provider, args, global, cancel).await,
        Command::ApiCredential(args) => api_credential::handle(provider, args, global, cancel).await,
        Command::Schema(_) | Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to the connected dispatcher".into(),
        )),
    }
}
