//! Settings command handlers.

use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use lookprov_api::models::Setting;
use lookprov_core::setting::SETTING_ID;
use lookprov_core::{Provider, Resource, SettingPlan, SettingState};

use crate::cli::{GlobalOpts, OutputFormat, SettingArgs, SettingCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Current")]
    old: String,
    #[tabled(rename = "Desired")]
    new: String,
}

fn plan_rows(plan: &SettingPlan) -> Vec<ChangeRow> {
    let mut rows: Vec<ChangeRow> = plan
        .changes
        .changes()
        .iter()
        .map(|c| ChangeRow {
            path: c.path.to_owned(),
            group: c.group.to_string(),
            old: c.old.as_ref().map(output::scalar).unwrap_or_default(),
            new: output::scalar(&c.new),
        })
        .collect();
    rows.extend(plan.changes.cleared().iter().map(|c| ChangeRow {
        path: c.path.to_owned(),
        group: c.group.to_string(),
        old: String::new(),
        new: format!("(cleared: {})", c.reason),
    }));
    rows
}

fn render_plan(format: OutputFormat, plan: &SettingPlan) -> String {
    match format {
        OutputFormat::Table if plan.is_noop() => "No changes. Settings match the desired state.".into(),
        OutputFormat::Table => output::render_table(&plan_rows(plan)),
        OutputFormat::Plain => plan_rows(plan)
            .into_iter()
            .map(|r| r.path)
            .collect::<Vec<_>>()
            .join("\n"),
        structured => output::render_single(structured, plan, |_| String::new()),
    }
}

fn setting_id(s: &SettingState) -> String {
    s.id.clone()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provider: &Provider,
    args: SettingArgs,
    global: &GlobalOpts,
    cancel: &CancellationToken,
) -> Result<(), CliError> {
    let settings = provider.settings();

    match args.command {
        SettingCommand::Show => {
            let state = settings.fetch(cancel).await?;
            let out = output::render_single(global.output, &state, setting_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingCommand::Plan { file } => {
            let desired = util::read_desired(&file)?;
            let plan = settings.plan(&desired, cancel).await?;
            output::print_output(&render_plan(global.output, &plan), global.quiet);
            Ok(())
        }

        SettingCommand::Apply { file } => {
            let desired = util::read_desired(&file)?;
            let (state, plan) = settings.apply(&desired, cancel).await?;
            if !global.quiet {
                if plan.is_noop() {
                    eprintln!("Settings already match; nothing sent");
                } else {
                    eprintln!(
                        "Settings updated: {} change(s), {} cleared",
                        plan.changes.changes().len(),
                        plan.changes.cleared().len()
                    );
                }
            }
            let out = output::render_single(global.output, &state, setting_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingCommand::Delete => {
            let mut state = SettingState {
                id: SETTING_ID.to_owned(),
                setting: Setting::default(),
            };
            settings.delete(&mut state, cancel).await?;
            if !global.quiet {
                eprintln!("Settings are no longer tracked; the instance keeps its current values");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use lookprov_core::DesiredSettings;
    use lookprov_core::setting::plan_against;
    use serde_json::json;

    use super::*;

    #[test]
    fn noop_plan_renders_a_message() {
        let fetched: Setting = serde_json::from_value(json!({ "timezone": "UTC" })).unwrap();
        let desired = DesiredSettings::new().with("timezone", "UTC").unwrap();
        let plan = plan_against(&fetched, &desired).unwrap();

        assert!(render_plan(OutputFormat::Table, &plan).starts_with("No changes"));
    }

    #[test]
    fn plain_plan_lists_changed_paths() {
        let fetched: Setting = serde_json::from_value(json!({ "timezone": "UTC" })).unwrap();
        let desired = DesiredSettings::new()
            .with("timezone", "Europe/Paris")
            .unwrap();
        let plan = plan_against(&fetched, &desired).unwrap();

        assert_eq!(render_plan(OutputFormat::Plain, &plan), "timezone");
    }
}
