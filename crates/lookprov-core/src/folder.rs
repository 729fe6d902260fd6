// ── Folders ──
//
// `looker_folder` exists twice: as a data source that resolves a folder
// by id or exact name, and as a managed resource.

use std::sync::Arc;

use lookprov_api::models::{Folder, FolderCreate, FolderUpdate};
use lookprov_api::{ListOptions, LookerClient};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::resource::{DataSource, Resource};
use crate::schema::{AttrType, Attribute, Schema};

pub const FOLDER_TYPE: &str = "looker_folder";

// ── Lookup data source ───────────────────────────────────────────────

/// Lookup key: exactly one of `id` or `name`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderQuery {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Resolved folder. `parent_id` and `parent_name` are empty strings for a
/// root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderLookupResult {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub parent_name: String,
}

#[derive(Debug, Clone)]
pub struct FolderLookup {
    client: Arc<LookerClient>,
}

impl FolderLookup {
    pub fn new(client: Arc<LookerClient>) -> Self {
        Self { client }
    }

    /// Search by name and keep the entry whose name matches exactly.
    ///
    /// The search endpoint also returns partial matches. When several
    /// folders share the exact name the last one returned wins.
    async fn find_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Folder, CoreError> {
        let candidates = self
            .client
            .search_folders(name, &ListOptions::default(), cancel)
            .await?
            .into_body();
        debug!(name, candidates = candidates.len(), "folder search returned");

        candidates
            .into_iter()
            .rev()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::not_found("folder", format!("name {name:?}")))
    }

    async fn find_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Folder, CoreError> {
        match self.client.get_folder(id, cancel).await {
            Ok(resp) => Ok(resp.into_body()),
            Err(e) if e.is_not_found() => Err(CoreError::not_found("folder", format!("id {id}"))),
            Err(e) => Err(e.into()),
        }
    }
}

impl DataSource for FolderLookup {
    type Query = FolderQuery;
    type Output = FolderLookupResult;

    const TYPE_NAME: &'static str = FOLDER_TYPE;

    fn schema() -> Schema {
        Schema::new(FOLDER_TYPE, "Look up a folder by id or by exact name.")
            .attr(Attribute::optional("id", AttrType::String, "Search folder based on id."))
            .attr(Attribute::optional("name", AttrType::String, "Search folder based on name."))
            .attr(Attribute::computed("parent_id", AttrType::String, "Id of the parent folder."))
            .attr(Attribute::computed("parent_name", AttrType::String, "Name of the parent folder."))
            .exactly_one_of(&["id", "name"])
    }

    async fn read(
        &self,
        query: &FolderQuery,
        cancel: &CancellationToken,
    ) -> Result<FolderLookupResult, CoreError> {
        let mut present = Vec::new();
        if query.id.is_some() {
            present.push("id");
        }
        if query.name.is_some() {
            present.push("name");
        }
        Self::schema().check_exactly_one_of(&present)?;

        let folder = if let Some(id) = &query.id {
            self.find_by_id(id, cancel).await?
        } else if let Some(name) = &query.name {
            self.find_by_name(name, cancel).await?
        } else {
            return Err(CoreError::validation("id", "none", "or name must be set"));
        };

        let (parent_id, parent_name) = match folder.parent_id.as_deref() {
            Some(parent_id) if !parent_id.is_empty() => {
                let parent = self.find_by_id(parent_id, cancel).await?;
                (parent_id.to_owned(), parent.name)
            }
            _ => (String::new(), String::new()),
        };

        Ok(FolderLookupResult {
            id: folder.id,
            name: folder.name,
            parent_id,
            parent_name,
        })
    }
}

// ── Managed resource ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderConfig {
    pub name: String,
    pub parent_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderState {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub is_personal: bool,
    pub is_shared_root: bool,
    pub child_count: i64,
    pub creator_id: String,
    pub content_metadata_id: String,
}

impl From<Folder> for FolderState {
    fn from(f: Folder) -> Self {
        Self {
            id: f.id,
            name: f.name,
            parent_id: f.parent_id.unwrap_or_default(),
            is_personal: f.is_personal.unwrap_or_default(),
            is_shared_root: f.is_shared_root.unwrap_or_default(),
            child_count: f.child_count.unwrap_or_default(),
            creator_id: f.creator_id.unwrap_or_default(),
            content_metadata_id: f.content_metadata_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FolderResource {
    client: Arc<LookerClient>,
}

impl FolderResource {
    pub fn new(client: Arc<LookerClient>) -> Self {
        Self { client }
    }
}

impl Resource for FolderResource {
    type Config = FolderConfig;
    type State = FolderState;

    const TYPE_NAME: &'static str = FOLDER_TYPE;

    fn schema() -> Schema {
        Schema::new(FOLDER_TYPE, "A content folder.")
            .attr(Attribute::computed("id", AttrType::String, "Server-assigned folder id."))
            .attr(Attribute::required("name", AttrType::String, "Folder name, unique among siblings."))
            .attr(Attribute::required("parent_id", AttrType::String, "Id of the parent folder."))
            .attr(Attribute::computed("is_personal", AttrType::Bool, "True for a user's personal folder."))
            .attr(Attribute::computed("is_shared_root", AttrType::Bool, "True for the Shared folder."))
            .attr(Attribute::computed("child_count", AttrType::Int, "Number of child folders."))
            .attr(Attribute::computed("creator_id", AttrType::String, "Id of the creating user."))
            .attr(Attribute::computed("content_metadata_id", AttrType::String, "Content metadata id."))
    }

    async fn create(
        &self,
        config: &FolderConfig,
        cancel: &CancellationToken,
    ) -> Result<FolderState, CoreError> {
        let body = FolderCreate {
            name: config.name.clone(),
            parent_id: config.parent_id.clone(),
        };
        let folder = self.client.create_folder(&body, cancel).await?.into_body();
        info!(id = %folder.id, name = %folder.name, "folder created");
        Ok(folder.into())
    }

    async fn read(
        &self,
        state: &FolderState,
        cancel: &CancellationToken,
    ) -> Result<Option<FolderState>, CoreError> {
        match self.client.get_folder(&state.id, cancel).await {
            Ok(resp) => Ok(Some(resp.into_body().into())),
            Err(e) if e.is_not_found() => {
                debug!(id = %state.id, "folder is gone");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        state: &FolderState,
        config: &FolderConfig,
        cancel: &CancellationToken,
    ) -> Result<FolderState, CoreError> {
        let body = FolderUpdate {
            name: (config.name != state.name).then(|| config.name.clone()),
            parent_id: (config.parent_id != state.parent_id).then(|| config.parent_id.clone()),
        };
        if body.name.is_none() && body.parent_id.is_none() {
            debug!(id = %state.id, "folder unchanged");
            return Ok(state.clone());
        }

        let folder = self
            .client
            .update_folder(&state.id, &body, cancel)
            .await?
            .into_body();
        info!(id = %folder.id, "folder updated");
        Ok(folder.into())
    }

    async fn delete(
        &self,
        state: &mut FolderState,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        self.client.delete_folder(&state.id, cancel).await?;
        info!(id = %state.id, "folder deleted");
        state.id.clear();
        Ok(())
    }

    async fn import(&self, id: &str, cancel: &CancellationToken) -> Result<FolderState, CoreError> {
        let probe = FolderState {
            id: id.to_owned(),
            ..FolderState::default()
        };
        self.read(&probe, cancel)
            .await?
            .ok_or_else(|| CoreError::not_found("folder", id))
    }
}
