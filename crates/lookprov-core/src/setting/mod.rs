// ── Instance settings ──
//
// The settings aggregate is a singleton with a fixed identifier. Applying
// it is a read-modify-write: fetch, diff the declared values against the
// server, enforce the cross-field rules, then PATCH only what is needed.

mod changes;
mod constraints;
mod desired;
pub mod fields;
mod payload;

use std::sync::Arc;

use lookprov_api::LookerClient;
use lookprov_api::models::Setting;
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use changes::{Change, ChangeSet, Cleared, GroupState};
pub use desired::DesiredSettings;
pub use fields::{Access, FieldGroup, FieldSpec};

use crate::error::CoreError;
use crate::resource::Resource;
use crate::schema::{AttrType, Attribute, Presence, Schema};

pub const SETTING_TYPE: &str = "looker_setting";
/// The only identifier a settings state ever carries.
pub const SETTING_ID: &str = "looker_settings";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingState {
    pub id: String,
    #[serde(flatten)]
    pub setting: Setting,
}

/// Outcome of comparing declared values to the server.
#[derive(Debug, Clone, Serialize)]
pub struct SettingPlan {
    pub changes: ChangeSet,
    /// The PATCH body, `None` when the server already matches.
    pub payload: Option<Setting>,
}

impl SettingPlan {
    pub fn is_noop(&self) -> bool {
        self.payload.is_none()
    }
}

/// Plan an apply against an already-fetched aggregate. Makes no calls.
pub fn plan_against(fetched: &Setting, desired: &DesiredSettings) -> Result<SettingPlan, CoreError> {
    let current = to_json(fetched)?;
    let mut working = fetched.clone();
    working.strip_read_only();
    let working = to_json(&working)?;

    let mut changes = changes::diff(&working, desired);
    constraints::apply_constraints(&mut changes, &current)?;
    let payload = payload::build_payload(&changes, &working)?;

    Ok(SettingPlan { changes, payload })
}

fn to_json(setting: &Setting) -> Result<Value, CoreError> {
    serde_json::to_value(setting).map_err(|e| CoreError::Internal(format!("cannot encode settings: {e}")))
}

#[derive(Debug, Clone)]
pub struct SettingResource {
    client: Arc<LookerClient>,
}

impl SettingResource {
    pub fn new(client: Arc<LookerClient>) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<SettingState, CoreError> {
        let setting = self.client.get_setting(cancel).await?.into_body();
        Ok(SettingState {
            id: SETTING_ID.to_owned(),
            setting,
        })
    }

    pub async fn plan(
        &self,
        desired: &DesiredSettings,
        cancel: &CancellationToken,
    ) -> Result<SettingPlan, CoreError> {
        let fetched = self.client.get_setting(cancel).await?.into_body();
        plan_against(&fetched, desired)
    }

    /// Reconcile the server with `desired` and return the refreshed state
    /// together with the plan that was executed.
    pub async fn apply(
        &self,
        desired: &DesiredSettings,
        cancel: &CancellationToken,
    ) -> Result<(SettingState, SettingPlan), CoreError> {
        let plan = self.plan(desired, cancel).await?;

        match &plan.payload {
            Some(body) => {
                self.client.update_setting(body, cancel).await?;
                info!(
                    changes = plan.changes.changes().len(),
                    cleared = plan.changes.cleared().len(),
                    "settings updated"
                );
            }
            None => debug!("settings already match"),
        }

        let state = self.fetch(cancel).await?;
        Ok((state, plan))
    }
}

impl Resource for SettingResource {
    type Config = DesiredSettings;
    type State = SettingState;

    const TYPE_NAME: &'static str = SETTING_TYPE;

    fn schema() -> Schema {
        let mut schema = Schema::new(SETTING_TYPE, "Instance-wide settings. A singleton.")
            .attr(Attribute::computed("id", AttrType::String, "Always looker_settings."));

        for spec in fields::group_fields(FieldGroup::Scalar) {
            schema = schema.attr(field_attribute(spec, spec.path));
        }
        for group in FieldGroup::iter() {
            let Some(key) = group.key() else { continue };
            let nested = fields::group_fields(group)
                .map(|spec| field_attribute(spec, spec.name()))
                .collect();
            schema = schema.attr(
                Attribute::new(key, AttrType::Block, Presence::OptionalComputed, group.description())
                    .with_nested(nested),
            );
        }
        schema
    }

    async fn create(
        &self,
        config: &DesiredSettings,
        cancel: &CancellationToken,
    ) -> Result<SettingState, CoreError> {
        Ok(self.apply(config, cancel).await?.0)
    }

    async fn read(
        &self,
        _state: &SettingState,
        cancel: &CancellationToken,
    ) -> Result<Option<SettingState>, CoreError> {
        self.fetch(cancel).await.map(Some)
    }

    async fn update(
        &self,
        _state: &SettingState,
        config: &DesiredSettings,
        cancel: &CancellationToken,
    ) -> Result<SettingState, CoreError> {
        Ok(self.apply(config, cancel).await?.0)
    }

    /// Stops tracking only. The aggregate cannot be deleted and is left as is.
    async fn delete(
        &self,
        state: &mut SettingState,
        _cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        info!("settings removed from tracking; the instance keeps its current values");
        state.id.clear();
        Ok(())
    }

    async fn import(&self, id: &str, cancel: &CancellationToken) -> Result<SettingState, CoreError> {
        if id != SETTING_ID {
            debug!(id, "settings import id ignored");
        }
        self.fetch(cancel).await
    }
}

fn field_attribute(spec: &FieldSpec, name: &'static str) -> Attribute {
    let attribute = match spec.access {
        Access::ReadOnly => Attribute::computed(name, spec.kind, spec.description),
        Access::ReadWrite => Attribute::new(name, spec.kind, Presence::OptionalComputed, spec.description),
        Access::WriteOnly => Attribute::optional(name, spec.kind, spec.description).write_only(),
    };
    match spec.deprecated {
        Some(message) => attribute.deprecated(message),
        None => attribute,
    }
}
