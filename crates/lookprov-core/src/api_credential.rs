// ── API credentials ──
//
// API3 client credentials scoped under a user. The client secret is only
// returned by the create call, so it is captured then and carried forward
// from prior state on every read. Credentials cannot be modified in place.

use std::sync::Arc;

use lookprov_api::LookerClient;
use lookprov_api::models::{ApiCredential, ApiCredentialCreate};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::resource::Resource;
use crate::schema::{AttrType, Attribute, Presence, Schema};

pub const API_CREDENTIAL_TYPE: &str = "looker_api_credentials";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiCredentialConfig {
    pub user_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(default)]
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ApiCredentialState {
    pub id: String,
    pub user_id: String,
    pub credential_type: String,
    pub is_disabled: bool,
    pub client_id: String,
    /// Present only if this state descends from the create call.
    pub client_secret: Option<SecretString>,
    pub url: String,
}

impl ApiCredentialState {
    fn from_wire(user_id: &str, cred: ApiCredential, prior_secret: Option<SecretString>) -> Self {
        Self {
            id: cred.id,
            user_id: user_id.to_owned(),
            credential_type: cred.credential_type,
            is_disabled: cred.is_disabled,
            client_id: cred.client_id,
            client_secret: cred.client_secret.map(SecretString::from).or(prior_secret),
            url: cred.url,
        }
    }

    /// The import identifier, `<user_id>/<credential_id>`.
    pub fn import_id(&self) -> String {
        format!("{}/{}", self.user_id, self.id)
    }
}

/// Renders the secret as a marker; use `client_secret` directly to reveal it.
impl Serialize for ApiCredentialState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            id: &'a str,
            user_id: &'a str,
            #[serde(rename = "type")]
            credential_type: &'a str,
            is_disabled: bool,
            client_id: &'a str,
            client_secret: Option<&'static str>,
            url: &'a str,
        }

        View {
            id: &self.id,
            user_id: &self.user_id,
            credential_type: &self.credential_type,
            is_disabled: self.is_disabled,
            client_id: &self.client_id,
            client_secret: self.client_secret.as_ref().map(|_| "(sensitive)"),
            url: &self.url,
        }
        .serialize(serializer)
    }
}

impl PartialEq for ApiCredentialState {
    fn eq(&self, other: &Self) -> bool {
        let secret = |s: &Self| s.client_secret.as_ref().map(|v| v.expose_secret().to_owned());
        self.id == other.id
            && self.user_id == other.user_id
            && self.credential_type == other.credential_type
            && self.is_disabled == other.is_disabled
            && self.client_id == other.client_id
            && self.url == other.url
            && secret(self) == secret(other)
    }
}

/// Split a `<user_id>/<credential_id>` import identifier.
pub fn parse_import_id(raw: &str) -> Result<(&str, &str), CoreError> {
    match raw.split_once('/') {
        Some((user, id)) if !user.is_empty() && !id.is_empty() && !id.contains('/') => {
            Ok((user, id))
        }
        _ => Err(CoreError::validation(
            format!("{API_CREDENTIAL_TYPE} import id"),
            format!("{raw:?}"),
            "must have the form <user_id>/<credential_id>",
        )),
    }
}

#[derive(Debug, Clone)]
pub struct ApiCredentialResource {
    client: Arc<LookerClient>,
}

impl ApiCredentialResource {
    pub fn new(client: Arc<LookerClient>) -> Self {
        Self { client }
    }
}

impl Resource for ApiCredentialResource {
    type Config = ApiCredentialConfig;
    type State = ApiCredentialState;

    const TYPE_NAME: &'static str = API_CREDENTIAL_TYPE;

    fn schema() -> Schema {
        Schema::new(API_CREDENTIAL_TYPE, "An API3 client credential owned by a user.")
            .attr(
                Attribute::required("user_id", AttrType::String, "ID of the user owning the API credential")
                    .force_new(),
            )
            .attr(
                Attribute::required("type", AttrType::String, "Type of API credential (e.g. api3)")
                    .force_new(),
            )
            .attr(Attribute::optional("is_disabled", AttrType::Bool, "Whether the credential is disabled (default false)"))
            .attr(Attribute::computed("client_id", AttrType::String, "Client ID of the API credential"))
            .attr(
                Attribute::new(
                    "client_secret",
                    AttrType::String,
                    Presence::Computed,
                    "Client secret of the API credential. Available only on creation.",
                )
                .sensitive(),
            )
            .attr(Attribute::computed("url", AttrType::String, "URL of the API credential resource"))
    }

    async fn create(
        &self,
        config: &ApiCredentialConfig,
        cancel: &CancellationToken,
    ) -> Result<ApiCredentialState, CoreError> {
        let body = ApiCredentialCreate {
            credential_type: config.credential_type.clone(),
            is_disabled: config.is_disabled,
        };
        let cred = self
            .client
            .create_api_credential(&config.user_id, &body, cancel)
            .await?
            .into_body();

        if cred.client_secret.is_none() {
            debug!(id = %cred.id, "create response carried no client secret");
        }
        info!(user_id = %config.user_id, id = %cred.id, "api credential created");
        Ok(ApiCredentialState::from_wire(&config.user_id, cred, None))
    }

    async fn read(
        &self,
        state: &ApiCredentialState,
        cancel: &CancellationToken,
    ) -> Result<Option<ApiCredentialState>, CoreError> {
        match self
            .client
            .get_api_credential(&state.user_id, &state.id, cancel)
            .await
        {
            Ok(resp) => Ok(Some(ApiCredentialState::from_wire(
                &state.user_id,
                resp.into_body(),
                state.client_secret.clone(),
            ))),
            Err(e) if e.is_not_found() => {
                debug!(user_id = %state.user_id, id = %state.id, "api credential is gone");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        state: &ApiCredentialState,
        _config: &ApiCredentialConfig,
        _cancel: &CancellationToken,
    ) -> Result<ApiCredentialState, CoreError> {
        Err(CoreError::UpdateNotSupported {
            resource_type: API_CREDENTIAL_TYPE.into(),
            reason: format!(
                "credential {} cannot be modified; delete it and create a new one instead",
                state.import_id()
            ),
        })
    }

    async fn delete(
        &self,
        state: &mut ApiCredentialState,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        self.client
            .delete_api_credential(&state.user_id, &state.id, cancel)
            .await?;
        info!(user_id = %state.user_id, id = %state.id, "api credential deleted");
        state.id.clear();
        Ok(())
    }

    async fn import(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiCredentialState, CoreError> {
        let (user_id, credential_id) = parse_import_id(id)?;
        let probe = ApiCredentialState {
            id: credential_id.to_owned(),
            user_id: user_id.to_owned(),
            ..ApiCredentialState::default()
        };
        self.read(&probe, cancel)
            .await?
            .ok_or_else(|| CoreError::not_found("api credential", id))
    }
}
