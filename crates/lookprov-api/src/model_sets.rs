// Model set endpoints

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{API_VERSION, ApiResponse, ListOptions, LookerClient, segment};
use crate::error::Error;
use crate::models::{ModelSet, ModelSetWrite};

impl LookerClient {
    /// `GET 4.0/model_sets/{id}`
    pub async fn get_model_set(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ModelSet>, Error> {
        debug!(id, "fetching model set");
        self.get(&format!("{API_VERSION}/model_sets/{}", segment(id)), cancel)
            .await
    }

    /// `GET 4.0/model_sets`
    pub async fn list_model_sets(
        &self,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<ModelSet>>, Error> {
        self.list(&format!("{API_VERSION}/model_sets"), options, cancel)
            .await
    }

    /// `POST 4.0/model_sets`
    pub async fn create_model_set(
        &self,
        body: &ModelSetWrite,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ModelSet>, Error> {
        debug!(name = ?body.name, "creating model set");
        self.create(&format!("{API_VERSION}/model_sets"), body, cancel)
            .await
    }

    /// `PATCH 4.0/model_sets/{id}`
    pub async fn update_model_set(
        &self,
        id: &str,
        body: &ModelSetWrite,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ModelSet>, Error> {
        debug!(id, "updating model set");
        self.update(&format!("{API_VERSION}/model_sets/{}", segment(id)), body, cancel)
            .await
    }

    /// `DELETE 4.0/model_sets/{id}`
    pub async fn delete_model_set(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<()>, Error> {
        debug!(id, "deleting model set");
        self.delete(&format!("{API_VERSION}/model_sets/{}", segment(id)), cancel)
            .await
    }
}
