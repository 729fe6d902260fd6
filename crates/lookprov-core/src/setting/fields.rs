// Static field table for the settings aggregate.
//
// One row per configurable or server-computed leaf. The schema, the diff,
// and the payload builder are all driven from this table, so adding a
// setting means adding a row here and a member to the wire type.

use serde::Serialize;

use crate::schema::AttrType;

/// Logical group a field belongs to. Nested groups are sent to the server
/// as whole objects; scalars are sent individually.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldGroup {
    Scalar,
    MarketplaceAutomation,
    PrivateLabel,
    CustomWelcomeEmail,
    Embed,
}

impl FieldGroup {
    /// Wire key of the nested object, `None` for top-level scalars.
    pub fn key(self) -> Option<&'static str> {
        match self {
            Self::Scalar => None,
            Self::MarketplaceAutomation => Some("marketplace_automation"),
            Self::PrivateLabel => Some("privatelabel_configuration"),
            Self::CustomWelcomeEmail => Some("custom_welcome_email"),
            Self::Embed => Some("embed_config"),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|g| g.key() == Some(key))
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Scalar => "Top-level settings",
            Self::MarketplaceAutomation => "Marketplace automation settings",
            Self::PrivateLabel => "Private label configuration",
            Self::CustomWelcomeEmail => "Custom welcome email configuration",
            Self::Embed => "Embed configuration. Requires embedding to be enabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Access {
    ReadWrite,
    /// Computed by the server; never sent.
    ReadOnly,
    /// Accepted on write; never returned.
    WriteOnly,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Dotted wire path, e.g. `embed_config.embed_cookieless_v2`.
    pub path: &'static str,
    pub group: FieldGroup,
    pub access: Access,
    #[serde(rename = "type")]
    pub kind: AttrType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<&'static str>,
    pub description: &'static str,
}

impl FieldSpec {
    /// Member name inside its group (the last path segment).
    pub fn name(&self) -> &'static str {
        self.path.rsplit('.').next().unwrap_or(self.path)
    }
}

const fn field(
    path: &'static str,
    group: FieldGroup,
    access: Access,
    kind: AttrType,
    description: &'static str,
) -> FieldSpec {
    FieldSpec {
        path,
        group,
        access,
        kind,
        deprecated: None,
        description,
    }
}

const fn deprecated(path: &'static str, message: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        group: FieldGroup::Scalar,
        access: Access::ReadWrite,
        kind: AttrType::Bool,
        deprecated: Some(message),
        description: message,
    }
}

use Access::{ReadOnly, ReadWrite, WriteOnly};
use AttrType::{Bool, Map, StringList};
use AttrType::String as Str;
use FieldGroup::{CustomWelcomeEmail, Embed, MarketplaceAutomation, PrivateLabel, Scalar};

pub static FIELDS: &[FieldSpec] = &[
    // ── Top level ───────────────────────────────────────────────────
    field("instance_config", Scalar, ReadOnly, Map, "Externally available instance configuration information"),
    field("extension_framework_enabled", Scalar, ReadWrite, Bool, "Toggle extension framework on or off"),
    deprecated(
        "extension_load_url_enabled",
        "Toggle extension load url on or off. Do not use. This is a temporary setting that will eventually become a noop and subsequently deleted",
    ),
    deprecated(
        "marketplace_auto_install_enabled",
        "Toggle marketplace auto install on or off. Auto install can now be enabled via marketplace automation settings",
    ),
    field("marketplace_enabled", Scalar, ReadWrite, Bool, "Toggle marketplace on or off"),
    field("marketplace_site", Scalar, ReadOnly, Str, "Location of Looker marketplace CDN"),
    field(
        "marketplace_terms_accepted",
        Scalar,
        ReadWrite,
        Bool,
        "Accept marketplace terms by setting this value to true. Marketplace terms cannot be declined once accepted",
    ),
    field("onboarding_enabled", Scalar, ReadWrite, Bool, "Toggle onboarding on or off"),
    field("timezone", Scalar, ReadWrite, Str, "Change instance-wide default timezone"),
    field("allow_user_timezones", Scalar, ReadWrite, Bool, "Toggle user-specific timezones on or off"),
    field("data_connector_default_enabled", Scalar, ReadWrite, Bool, "Toggle default future connectors on or off"),
    field("host_url", Scalar, ReadWrite, Str, "Change the base portion of your Looker instance URL setting"),
    field(
        "override_warnings",
        Scalar,
        WriteOnly,
        Bool,
        "If warnings are preventing a host URL change, force the update. Does not directly change any setting",
    ),
    field(
        "email_domain_allowlist",
        Scalar,
        ReadWrite,
        StringList,
        "List of email domains that are allowed to be used for user creation",
    ),
    field("embed_enabled", Scalar, ReadOnly, Bool, "True if embedding is enabled"),
    field("login_notification_enabled", Scalar, ReadOnly, Bool, "Toggle login notification on or off"),
    field("login_notification_text", Scalar, ReadOnly, Str, "Text to display in the login notification banner"),
    field("dashboard_auto_refresh_restriction", Scalar, ReadWrite, Bool, "Toggle dashboard auto refresh restriction"),
    field(
        "dashboard_auto_refresh_minimum_interval",
        Scalar,
        ReadWrite,
        Str,
        "Minimum time interval for dashboard element automatic refresh. Examples: (30 seconds, 1 minute)",
    ),
    field("managed_certificate_uri", Scalar, ReadWrite, StringList, "Managed certificate URIs"),
    // ── Marketplace automation ──────────────────────────────────────
    field(
        "marketplace_automation.install_enabled",
        MarketplaceAutomation,
        ReadWrite,
        Bool,
        "Whether marketplace auto installation is enabled",
    ),
    field(
        "marketplace_automation.update_looker_enabled",
        MarketplaceAutomation,
        ReadWrite,
        Bool,
        "Whether marketplace auto update is enabled for looker extensions",
    ),
    field(
        "marketplace_automation.update_third_party_enabled",
        MarketplaceAutomation,
        ReadWrite,
        Bool,
        "Whether marketplace auto update is enabled for third party extensions",
    ),
    // ── Private label ───────────────────────────────────────────────
    field(
        "privatelabel_configuration.logo_file",
        PrivateLabel,
        WriteOnly,
        Str,
        "Customer logo image. Expected base64 encoded data",
    ),
    field("privatelabel_configuration.logo_url", PrivateLabel, ReadOnly, Str, "Logo image url"),
    field(
        "privatelabel_configuration.favicon_file",
        PrivateLabel,
        WriteOnly,
        Str,
        "Custom favicon image. Expected base64 encoded data",
    ),
    field("privatelabel_configuration.favicon_url", PrivateLabel, ReadOnly, Str, "Favicon image url"),
    field("privatelabel_configuration.default_title", PrivateLabel, ReadWrite, Str, "Default page title"),
    field("privatelabel_configuration.show_help_menu", PrivateLabel, ReadWrite, Bool, "Toggle showing help menus"),
    field("privatelabel_configuration.show_docs", PrivateLabel, ReadWrite, Bool, "Toggle showing docs"),
    field(
        "privatelabel_configuration.show_email_sub_options",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Toggle showing email subscription options",
    ),
    field(
        "privatelabel_configuration.allow_looker_mentions",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Toggle mentions of Looker in emails",
    ),
    field(
        "privatelabel_configuration.allow_looker_links",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Toggle links to Looker in emails",
    ),
    field(
        "privatelabel_configuration.custom_welcome_email_advanced",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Allow subject line and email heading customization in customized emails",
    ),
    field(
        "privatelabel_configuration.setup_mentions",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Remove the word Looker from appearing in the account setup page",
    ),
    field("privatelabel_configuration.alerts_logo", PrivateLabel, ReadWrite, Bool, "Remove Looker logo from Alerts"),
    field("privatelabel_configuration.alerts_links", PrivateLabel, ReadWrite, Bool, "Remove Looker links from Alerts"),
    field(
        "privatelabel_configuration.folders_mentions",
        PrivateLabel,
        ReadWrite,
        Bool,
        "Remove Looker mentions in home folder page when you don't have any items saved",
    ),
    // ── Custom welcome email ────────────────────────────────────────
    field(
        "custom_welcome_email.enabled",
        CustomWelcomeEmail,
        ReadWrite,
        Bool,
        "If true, custom email content will replace the default body of welcome emails",
    ),
    field(
        "custom_welcome_email.content",
        CustomWelcomeEmail,
        ReadWrite,
        Str,
        "Requires custom_welcome_email.enabled. The HTML to use as custom content for welcome emails",
    ),
    field(
        "custom_welcome_email.subject",
        CustomWelcomeEmail,
        ReadWrite,
        Str,
        "Requires custom_welcome_email.enabled and privatelabel_configuration.custom_welcome_email_advanced. Email subject line",
    ),
    field(
        "custom_welcome_email.header",
        CustomWelcomeEmail,
        ReadWrite,
        Str,
        "Requires custom_welcome_email.enabled and privatelabel_configuration.custom_welcome_email_advanced. Email header line",
    ),
    // ── Embed ───────────────────────────────────────────────────────
    field("embed_config.domain_allowlist", Embed, ReadWrite, StringList, "Domains allowed to embed content"),
    field("embed_config.alert_url_allowlist", Embed, ReadWrite, StringList, "URLs allowed as alert destinations"),
    field(
        "embed_config.alert_url_param_owner",
        Embed,
        ReadWrite,
        Str,
        "Owner of who defines the alert/schedule params on the base url",
    ),
    field("embed_config.alert_url_label", Embed, ReadWrite, Str, "Label for the alert/schedule url"),
    field("embed_config.sso_auth_enabled", Embed, ReadWrite, Bool, "Is SSO embedding enabled for this Looker"),
    field("embed_config.embed_cookieless_v2", Embed, ReadWrite, Bool, "Is Cookieless embedding enabled for this Looker"),
    field(
        "embed_config.embed_content_navigation",
        Embed,
        ReadWrite,
        Bool,
        "Is embed content navigation enabled for this looker",
    ),
    field(
        "embed_config.embed_content_management",
        Embed,
        ReadWrite,
        Bool,
        "Is embed content management enabled for this Looker",
    ),
    field(
        "embed_config.strict_sameorigin_for_login",
        Embed,
        ReadWrite,
        Bool,
        "When true, prohibits the use of Looker login pages in non-Looker iframes",
    ),
    field("embed_config.look_filters", Embed, ReadWrite, Bool, "When true, filters are enabled on embedded Looks"),
    field(
        "embed_config.hide_look_navigation",
        Embed,
        ReadWrite,
        Bool,
        "When true, removes navigation to Looks from embedded dashboards and explores",
    ),
    field("embed_config.embed_enabled", Embed, ReadOnly, Bool, "True if embedding is licensed for this Looker instance"),
];

pub fn lookup(path: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.path == path)
}

/// Rows belonging to one group, in table order.
pub fn group_fields(group: FieldGroup) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |f| f.group == group)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn paths_are_unique() {
        let mut seen = HashSet::new();
        for f in FIELDS {
            assert!(seen.insert(f.path), "duplicate {}", f.path);
        }
    }

    #[test]
    fn nested_paths_live_under_their_group_key() {
        for f in FIELDS {
            match f.group.key() {
                Some(key) => assert!(f.path.starts_with(&format!("{key}.")), "{}", f.path),
                None => assert!(!f.path.contains('.'), "{}", f.path),
            }
        }
    }

    #[test]
    fn read_only_and_write_only_sets() {
        let ro: Vec<_> = FIELDS.iter().filter(|f| f.access == ReadOnly).map(|f| f.path).collect();
        assert_eq!(
            ro,
            vec![
                "instance_config",
                "marketplace_site",
                "embed_enabled",
                "login_notification_enabled",
                "login_notification_text",
                "privatelabel_configuration.logo_url",
                "privatelabel_configuration.favicon_url",
                "embed_config.embed_enabled",
            ]
        );
        let wo: Vec<_> = FIELDS.iter().filter(|f| f.access == WriteOnly).map(|f| f.path).collect();
        assert_eq!(
            wo,
            vec![
                "override_warnings",
                "privatelabel_configuration.logo_file",
                "privatelabel_configuration.favicon_file",
            ]
        );
    }

    #[test]
    fn group_keys_round_trip() {
        assert_eq!(FieldGroup::from_key("embed_config"), Some(FieldGroup::Embed));
        assert_eq!(FieldGroup::from_key("timezone"), None);
    }
}
