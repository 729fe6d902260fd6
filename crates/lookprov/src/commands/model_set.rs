//! Model set command handlers.

use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use lookprov_core::{CoreError, ModelSetConfig, ModelSetState, Provider, Resource};

use crate::cli::{GlobalOpts, ModelSetArgs, ModelSetCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ModelSetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Models")]
    models: String,
    #[tabled(rename = "Built-in")]
    built_in: &'static str,
}

impl From<&ModelSetState> for ModelSetRow {
    fn from(m: &ModelSetState) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            models: m.models.iter().cloned().collect::<Vec<_>>().join(", "),
            built_in: if m.built_in { "yes" } else { "no" },
        }
    }
}

pub async fn handle(
    provider: &Provider,
    args: ModelSetArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let model_sets = provider.model_sets();

    match args.command {
        ModelSetCommand::List(list) => {
            let all: Vec<ModelSetState> = provider
                .client()
                .list_model_sets(&util::list_options(&list), cancel)
                .await
                .map_err(CoreError::from)?
                .into_body()
                .into_iter()
                .map(ModelSetState::from)
                .collect();
            let out = output::render_list(global.output, &all, |m| ModelSetRow::from(m), |m| m.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModelSetCommand::Show { id } => {
            let state = model_sets.import(&id, cancel).await?;
            let out = output::render_single(global.output, &state, |m| m.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModelSetCommand::Create { name, models } => {
            let config = ModelSetConfig {
                name,
                models: models.into_iter().collect(),
            };
            let state = model_sets.create(&config, cancel).await?;
            if !global.quiet {
                eprintln!("Model set {} created", state.id);
            }
            let out = output::render_single(global.output, &state, |m| m.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModelSetCommand::Update { id, name, models } => {
            let current = model_sets.import(&id, cancel).await?;
            let config = ModelSetConfig {
                name: name.unwrap_or_else(|| current.name.clone()),
                models: if models.is_empty() {
                    current.models.clone()
                } else {
                    models.into_iter().collect()
                },
            };
            let state = model_sets.update(&current, &config, cancel).await?;
            let out = output::render_single(global.output, &state, |m| m.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModelSetCommand::Delete { id } => {
            if !util::confirm(&format!("Delete model set {id}?"), "model-set delete", global.yes)? {
                return Ok(());
            }
            let mut state = ModelSetState {
                id,
                ..ModelSetState::default()
            };
            model_sets.delete(&mut state, cancel).await?;
            if !global.quiet {
                eprintln!("Model set deleted");
            }
            Ok(())
        }
    }
}
