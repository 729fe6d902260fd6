// Folder endpoints
//
// Folders are addressed by server-assigned string ids under `4.0/folders`.
// Name search is a prefix/substring match on the server side; callers that
// need an exact match filter the results themselves.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{API_VERSION, ApiResponse, ListOptions, LookerClient, segment};
use crate::error::Error;
use crate::models::{Folder, FolderCreate, FolderUpdate};

impl LookerClient {
    /// Fetch a single folder.
    ///
    /// `GET 4.0/folders/{id}`
    pub async fn get_folder(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Folder>, Error> {
        debug!(id, "fetching folder");
        self.get(&format!("{API_VERSION}/folders/{}", segment(id)), cancel)
            .await
    }

    /// List every folder visible to the caller.
    ///
    /// `GET 4.0/folders`
    pub async fn list_folders(
        &self,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Folder>>, Error> {
        self.list(&format!("{API_VERSION}/folders"), options, cancel)
            .await
    }

    /// Search folders by name.
    ///
    /// `GET 4.0/folders/search?name={name}`
    pub async fn search_folders(
        &self,
        name: &str,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Folder>>, Error> {
        debug!(name, "searching folders");
        let options = options.clone().with_filter("name", name);
        self.list(&format!("{API_VERSION}/folders/search"), &options, cancel)
            .await
    }

    /// Create a folder.
    ///
    /// `POST 4.0/folders`
    pub async fn create_folder(
        &self,
        body: &FolderCreate,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Folder>, Error> {
        debug!(name = %body.name, parent_id = %body.parent_id, "creating folder");
        self.create(&format!("{API_VERSION}/folders"), body, cancel)
            .await
    }

    /// Rename or move a folder.
    ///
    /// `PATCH 4.0/folders/{id}`
    pub async fn update_folder(
        &self,
        id: &str,
        body: &FolderUpdate,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Folder>, Error> {
        debug!(id, "updating folder");
        self.update(&format!("{API_VERSION}/folders/{}", segment(id)), body, cancel)
            .await
    }

    /// Delete a folder and everything in it.
    ///
    /// `DELETE 4.0/folders/{id}`
    pub async fn delete_folder(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<()>, Error> {
        debug!(id, "deleting folder");
        self.delete(&format!("{API_VERSION}/folders/{}", segment(id)), cancel)
            .await
    }
}
