// ── Model sets ──
//
// Named sets of LookML models used by roles. `models` is a set: ordering
// and duplicates in the configuration carry no meaning.

use std::collections::BTreeSet;
use std::sync::Arc;

use lookprov_api::LookerClient;
use lookprov_api::models::{ModelSet, ModelSetWrite};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::resource::Resource;
use crate::schema::{AttrType, Attribute, Schema};

pub const MODEL_SET_TYPE: &str = "looker_model_set";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSetConfig {
    pub name: String,
    pub models: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelSetState {
    pub id: String,
    pub name: String,
    pub models: BTreeSet<String>,
    pub all_access: bool,
    pub built_in: bool,
    pub url: String,
}

impl From<ModelSet> for ModelSetState {
    fn from(m: ModelSet) -> Self {
        Self {
            id: m.id,
            name: m.name,
            models: m.models.into_iter().collect(),
            all_access: m.all_access.unwrap_or_default(),
            built_in: m.built_in.unwrap_or_default(),
            url: m.url.unwrap_or_default(),
        }
    }
}

impl ModelSetConfig {
    fn to_wire(&self) -> ModelSetWrite {
        ModelSetWrite {
            name: Some(self.name.clone()),
            models: Some(self.models.iter().cloned().collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelSetResource {
    client: Arc<LookerClient>,
}

impl ModelSetResource {
    pub fn new(client: Arc<LookerClient>) -> Self {
        Self { client }
    }
}

impl Resource for ModelSetResource {
    type Config = ModelSetConfig;
    type State = ModelSetState;

    const TYPE_NAME: &'static str = MODEL_SET_TYPE;

    fn schema() -> Schema {
        Schema::new(MODEL_SET_TYPE, "A named set of LookML models.")
            .attr(Attribute::computed("id", AttrType::String, "Server-assigned model set id."))
            .attr(Attribute::required("name", AttrType::String, "Name for ModelSet of LookML Models"))
            .attr(Attribute::required("models", AttrType::StringSet, "List of LookML Model names"))
            .attr(Attribute::computed("all_access", AttrType::Bool, "True if the set grants access to every model."))
            .attr(Attribute::computed("built_in", AttrType::Bool, "True for sets shipped with Looker."))
            .attr(Attribute::computed("url", AttrType::String, "Link to this item."))
    }

    async fn create(
        &self,
        config: &ModelSetConfig,
        cancel: &CancellationToken,
    ) -> Result<ModelSetState, CoreError> {
        let set = self
            .client
            .create_model_set(&config.to_wire(), cancel)
            .await?
            .into_body();
        info!(id = %set.id, name = %set.name, "model set created");
        Ok(set.into())
    }

    async fn read(
        &self,
        state: &ModelSetState,
        cancel: &CancellationToken,
    ) -> Result<Option<ModelSetState>, CoreError> {
        match self.client.get_model_set(&state.id, cancel).await {
            Ok(resp) => Ok(Some(resp.into_body().into())),
            Err(e) if e.is_not_found() => {
                debug!(id = %state.id, "model set is gone");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        state: &ModelSetState,
        config: &ModelSetConfig,
        cancel: &CancellationToken,
    ) -> Result<ModelSetState, CoreError> {
        let current = self
            .read(state, cancel)
            .await?
            .ok_or_else(|| CoreError::not_found("model set", state.id.clone()))?;

        if current.name == config.name && current.models == config.models {
            debug!(id = %state.id, "model set unchanged");
            return Ok(current);
        }

        let set = self
            .client
            .update_model_set(&state.id, &config.to_wire(), cancel)
            .await?
            .into_body();
        info!(id = %set.id, models = set.models.len(), "model set updated");
        Ok(set.into())
    }

    async fn delete(
        &self,
        state: &mut ModelSetState,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        self.client.delete_model_set(&state.id, cancel).await?;
        info!(id = %state.id, "model set deleted");
        state.id.clear();
        Ok(())
    }

    async fn import(&self, id: &str, cancel: &CancellationToken) -> Result<ModelSetState, CoreError> {
        let probe = ModelSetState {
            id: id.to_owned(),
            ..ModelSetState::default()
        };
        self.read(&probe, cancel)
            .await?
            .ok_or_else(|| CoreError::not_found("model set", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_are_sorted_and_deduplicated() {
        let state: ModelSetState = ModelSet {
            id: "3".into(),
            name: "analysts".into(),
            models: vec!["thelook".into(), "ecommerce".into(), "thelook".into()],
            ..ModelSet::default()
        }
        .into();
        let models: Vec<_> = state.models.iter().map(String::as_str).collect();
        assert_eq!(models, vec!["ecommerce", "thelook"]);
    }
}
