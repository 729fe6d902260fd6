//! Folder command handlers.

use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use lookprov_core::{
    CoreError, DataSource, FolderConfig, FolderLookupResult, FolderQuery, FolderState, Provider, Resource,
};

use crate::cli::{FolderArgs, FolderCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    parent_id: String,
    #[tabled(rename = "Children")]
    child_count: i64,
    #[tabled(rename = "Personal")]
    personal: &'static str,
}

impl From<&FolderState> for FolderRow {
    fn from(f: &FolderState) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            parent_id: f.parent_id.clone(),
            child_count: f.child_count,
            personal: if f.is_personal { "yes" } else { "no" },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provider: &Provider,
    args: FolderArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let folders = provider.folders();

    match args.command {
        FolderCommand::Lookup { id, name } => {
            let found = provider
                .folder_lookup()
                .read(&FolderQuery { id, name }, cancel)
                .await?;
            let out = output::render_single(global.output, &found, |f: &FolderLookupResult| {
                f.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::List(list) => {
            let all: Vec<FolderState> = provider
                .client()
                .list_folders(&util::list_options(&list), cancel)
                .await
                .map_err(CoreError::from)?
                .into_body()
                .into_iter()
                .map(FolderState::from)
                .collect();
            let out = output::render_list(global.output, &all, |f| FolderRow::from(f), |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Show { id } => {
            let state = folders.import(&id, cancel).await?;
            let out = output::render_single(global.output, &state, |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Create { name, parent_id } => {
            let state = folders
                .create(&FolderConfig { name, parent_id }, cancel)
                .await?;
            if !global.quiet {
                eprintln!("Folder {} created", state.id);
            }
            let out = output::render_single(global.output, &state, |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Update {
            id,
            name,
            parent_id,
        } => {
            let current = folders.import(&id, cancel).await?;
            let config = FolderConfig {
                name: name.unwrap_or_else(|| current.name.clone()),
                parent_id: parent_id.unwrap_or_else(|| current.parent_id.clone()),
            };
            let state = folders.update(&current, &config, cancel).await?;
            if !global.quiet {
                eprintln!("Folder {} updated", state.id);
            }
            let out = output::render_single(global.output, &state, |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FolderCommand::Delete { id } => {
            if !util::confirm(&format!("Delete folder {id}?"), "folder delete", global.yes)? {
                return Ok(());
            }
            let mut state = FolderState {
                id,
                ..FolderState::default()
            };
            folders.delete(&mut state, cancel).await?;
            if !global.quiet {
                eprintln!("Folder deleted");
            }
            Ok(())
        }
    }
}
