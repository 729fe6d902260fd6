// ── Provider facade ──
//
// One authenticated client shared by every resource module. The host (or
// the CLI) builds a `Provider` once and asks it for the module it needs.

use std::sync::Arc;

use lookprov_api::LookerClient;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api_credential::ApiCredentialResource;
use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::folder::{FolderLookup, FolderResource};
use crate::model_set::ModelSetResource;
use crate::resource::{DataSource, Resource};
use crate::schema::Schema;
use crate::setting::SettingResource;

#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<LookerClient>,
}

/// Every type the provider exposes.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    pub resources: Vec<Schema>,
    pub data_sources: Vec<Schema>,
}

impl Provider {
    /// Build the HTTP client and authenticate.
    ///
    /// With API3 client credentials this performs the login exchange, so a
    /// bad secret fails here rather than on the first resource call.
    pub async fn connect(
        config: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> Result<Self, CoreError> {
        let client = LookerClient::connect(
            config.base_url.as_str(),
            &config.auth,
            &config.transport(),
            cancel,
        )
        .await?;
        info!(
            url = %client.base_url(),
            auth = ?config.auth.strategy(),
            "connected to Looker"
        );
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: LookerClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &LookerClient {
        &self.client
    }

    pub fn folders(&self) -> FolderResource {
        FolderResource::new(Arc::clone(&self.client))
    }

    pub fn folder_lookup(&self) -> FolderLookup {
        FolderLookup::new(Arc::clone(&self.client))
    }

    pub fn model_sets(&self) -> ModelSetResource {
        ModelSetResource::new(Arc::clone(&self.client))
    }

    pub fn api_credentials(&self) -> ApiCredentialResource {
        ApiCredentialResource::new(Arc::clone(&self.client))
    }

    pub fn settings(&self) -> SettingResource {
        SettingResource::new(Arc::clone(&self.client))
    }

    pub fn schemas() -> ProviderSchemas {
        ProviderSchemas {
            resources: vec![
                FolderResource::schema(),
                ModelSetResource::schema(),
                ApiCredentialResource::schema(),
                SettingResource::schema(),
            ],
            data_sources: vec![FolderLookup::schema()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_list_every_type() {
        let schemas = Provider::schemas();
        let names: Vec<_> = schemas.resources.iter().map(|s| s.type_name).collect();
        assert_eq!(
            names,
            vec!["looker_folder", "looker_model_set", "looker_api_credentials", "looker_setting"]
        );
        assert_eq!(schemas.data_sources[0].exactly_one_of, vec![vec!["id", "name"]]);
    }
}
