//! Resource modules and the settings reconciler for the Looker provider.
//!
//! Each managed object type implements [`Resource`]: create, read, update,
//! delete and import against the REST API, with typed configuration and
//! state records. [`Provider`] holds the shared authenticated client and
//! hands out the modules:
//!
//! - **[`FolderResource`] / [`FolderLookup`]** manage folders and resolve a
//!   folder by id or exact name.
//! - **[`ApiCredentialResource`]** issues and revokes API3 credentials. The
//!   secret is captured once at creation.
//! - **[`ModelSetResource`]** manages named sets of LookML models.
//! - **[`SettingResource`]** reconciles the instance-wide settings
//!   singleton. See [`setting`] for the diff and constraint rules.
//!
//! Every type also publishes an attribute [`Schema`] for the host runtime.

pub mod api_credential;
pub mod config;
pub mod error;
pub mod folder;
pub mod model_set;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod setting;

pub use api_credential::{ApiCredentialConfig, ApiCredentialResource, ApiCredentialState};
pub use config::{ProviderConfig, TlsVerification};
pub use error::CoreError;
pub use folder::{FolderConfig, FolderLookup, FolderLookupResult, FolderQuery, FolderResource, FolderState};
pub use model_set::{ModelSetConfig, ModelSetResource, ModelSetState};
pub use provider::{Provider, ProviderSchemas};
pub use resource::{DataSource, Resource};
pub use schema::{AttrType, Attribute, Presence, Schema};
pub use setting::{DesiredSettings, SettingPlan, SettingResource, SettingState};
