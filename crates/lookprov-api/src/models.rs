// Looker 4.0 wire types
//
// Request and response bodies for the endpoints this crate wraps. Server
// computed fields use `Option` with `#[serde(default)]`; the settings
// aggregate uses `Nullable` throughout so a PATCH body carries exactly the
// fields that were staged and nothing else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nullable::Nullable;

// ── Folder ───────────────────────────────────────────────────────────

/// A content folder from `GET 4.0/folders/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_personal: Option<bool>,
    #[serde(default)]
    pub is_shared_root: Option<bool>,
    #[serde(default)]
    pub child_count: Option<i64>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub content_metadata_id: Option<String>,
}

/// Body for `POST 4.0/folders`. Both fields are mandatory on creation.
#[derive(Debug, Clone, Serialize)]
pub struct FolderCreate {
    pub name: String,
    pub parent_id: String,
}

/// Body for `PATCH 4.0/folders/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

// ── API credential ───────────────────────────────────────────────────

/// An API3 client credential scoped under a user.
///
/// `client_secret` is only present in the response to the create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredential {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, rename = "type")]
    pub credential_type: String,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub url: String,
}

/// Body for `POST 4.0/users/{user_id}/credentials_api3`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiCredentialCreate {
    #[serde(rename = "type")]
    pub credential_type: String,
    pub is_disabled: bool,
}

// ── Model set ────────────────────────────────────────────────────────

/// A named set of LookML models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSet {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub all_access: Option<bool>,
    #[serde(default)]
    pub built_in: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body for `POST 4.0/model_sets` and `PATCH 4.0/model_sets/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelSetWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}

// ── Setting ──────────────────────────────────────────────────────────

/// The instance-wide settings aggregate (`GET`/`PATCH 4.0/setting`).
///
/// Read-only members: `instance_config`, `marketplace_site`,
/// `embed_enabled`, `login_notification_enabled`, `login_notification_text`,
/// `privatelabel_configuration.{logo_url,favicon_url}` and
/// `embed_config.embed_enabled`. Write-only members: `override_warnings`
/// and `privatelabel_configuration.{logo_file,favicon_file}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub instance_config: Nullable<InstanceConfig>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub extension_framework_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub extension_load_url_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub marketplace_auto_install_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub marketplace_automation: Nullable<MarketplaceAutomation>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub marketplace_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub marketplace_site: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub marketplace_terms_accepted: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub privatelabel_configuration: Nullable<PrivatelabelConfiguration>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub custom_welcome_email: Nullable<CustomWelcomeEmail>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub onboarding_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub timezone: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub allow_user_timezones: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub data_connector_default_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub host_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub override_warnings: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub email_domain_allowlist: Nullable<Vec<String>>,
    /// Superseded by `embed_config.embed_cookieless_v2`, which wins when both
    /// are present.
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_cookieless_v2: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_config: Nullable<EmbedConfig>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub login_notification_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub login_notification_text: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub dashboard_auto_refresh_restriction: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub dashboard_auto_refresh_minimum_interval: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub managed_certificate_uri: Nullable<Vec<String>>,
}

impl Setting {
    /// Drop every server-computed member so the value can be sent back.
    pub fn strip_read_only(&mut self) {
        self.instance_config = Nullable::Unset;
        self.marketplace_site = Nullable::Unset;
        self.embed_enabled = Nullable::Unset;
        self.login_notification_enabled = Nullable::Unset;
        self.login_notification_text = Nullable::Unset;

        if let Nullable::Value(pl) = &mut self.privatelabel_configuration {
            pl.logo_url = Nullable::Unset;
            pl.favicon_url = Nullable::Unset;
        }
        if let Nullable::Value(embed) = &mut self.embed_config {
            embed.embed_enabled = Nullable::Unset;
        }
    }
}

/// Externally visible instance information (read-only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    #[serde(default)]
    pub feature_flags: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub license_features: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceAutomation {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub install_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub update_looker_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub update_third_party_enabled: Nullable<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatelabelConfiguration {
    /// Base64 image data (write-only).
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub logo_file: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub logo_url: Nullable<String>,
    /// Base64 image data (write-only).
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub favicon_file: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub favicon_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub default_title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub show_help_menu: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub show_docs: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub show_email_sub_options: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub allow_looker_mentions: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub allow_looker_links: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub custom_welcome_email_advanced: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub setup_mentions: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub alerts_logo: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub alerts_links: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub folders_mentions: Nullable<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomWelcomeEmail {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub content: Nullable<String>,
    /// Requires `privatelabel_configuration.custom_welcome_email_advanced`.
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub subject: Nullable<String>,
    /// Requires `privatelabel_configuration.custom_welcome_email_advanced`.
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub header: Nullable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub domain_allowlist: Nullable<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub alert_url_allowlist: Nullable<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub alert_url_param_owner: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub alert_url_label: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub sso_auth_enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_cookieless_v2: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_content_navigation: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_content_management: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub strict_sameorigin_for_login: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub look_filters: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub hide_look_navigation: Nullable<bool>,
    /// True if embedding is licensed for this instance (read-only).
    #[serde(default, skip_serializing_if = "Nullable::is_unset")]
    pub embed_enabled: Nullable<bool>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn strip_read_only_removes_server_fields_only() {
        let mut setting: Setting = serde_json::from_value(json!({
            "instance_config": { "feature_flags": { "x": true } },
            "marketplace_site": "https://cdn",
            "embed_enabled": true,
            "login_notification_enabled": false,
            "login_notification_text": "hi",
            "timezone": "UTC",
            "privatelabel_configuration": {
                "logo_url": "https://logo",
                "favicon_url": "https://fav",
                "default_title": "Acme"
            },
            "embed_config": { "embed_enabled": true, "look_filters": false }
        }))
        .unwrap();

        setting.strip_read_only();

        assert_eq!(
            serde_json::to_value(&setting).unwrap(),
            json!({
                "timezone": "UTC",
                "privatelabel_configuration": { "default_title": "Acme" },
                "embed_config": { "look_filters": false }
            })
        );
    }

    #[test]
    fn api_credential_secret_is_optional_on_read() {
        let cred: ApiCredential = serde_json::from_value(json!({
            "id": "8",
            "client_id": "yyy",
            "type": "api3",
            "is_disabled": false,
            "url": "https://localhost:19999/api/4.0/users/18/credentials_api3/8"
        }))
        .unwrap();
        assert_eq!(cred.client_secret, None);
        assert_eq!(cred.credential_type, "api3");
    }
}
