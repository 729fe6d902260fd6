// Cross-field rules the server enforces on the settings aggregate.
//
// Rules run in a fixed order against the staged changes. A rule either
// rejects the plan with a validation error or drops members from the
// outgoing write. The effective value of a field is its staged value,
// falling back to what the server returned. The read-only embed flag is
// never staged, so for it the caller's declaration takes that place.

use serde_json::Value;
use tracing::warn;

use super::changes::{value_at, ChangeSet};
use super::desired::compact;
use super::fields::FieldGroup;
use crate::error::CoreError;

const ADVANCED: &str = "privatelabel_configuration.custom_welcome_email_advanced";
const WELCOME_ENABLED: &str = "custom_welcome_email.enabled";
const COOKIELESS: &str = "embed_config.embed_cookieless_v2";
const EMBED_ENABLED: &str = "embed_config.embed_enabled";

const ADVANCED_MEMBERS: [&str; 2] = ["custom_welcome_email.subject", "custom_welcome_email.header"];
const WELCOME_MEMBERS: [&str; 3] = [
    "custom_welcome_email.content",
    "custom_welcome_email.subject",
    "custom_welcome_email.header",
];

pub fn apply_constraints(changes: &mut ChangeSet, current: &Value) -> Result<(), CoreError> {
    advanced_welcome_email(changes, current)?;
    welcome_email_enabled(changes, current);
    cookieless_embed(changes, current)
}

/// Subject and header need advanced welcome-email customization.
fn advanced_welcome_email(changes: &mut ChangeSet, current: &Value) -> Result<(), CoreError> {
    if effective_bool(changes, current, ADVANCED) != Some(false) {
        return Ok(());
    }

    for path in ADVANCED_MEMBERS {
        if let Some(Value::String(s)) = changes.declared(path).filter(|v| v.as_str() != Some("")) {
            return Err(CoreError::validation(
                path,
                format!("{s:?}"),
                format!("cannot be set when {ADVANCED} is false"),
            ));
        }
    }
    for path in ADVANCED_MEMBERS {
        clear(changes, current, path, "custom welcome email advanced is off");
    }
    Ok(())
}

/// A disabled welcome email carries no content.
fn welcome_email_enabled(changes: &mut ChangeSet, current: &Value) {
    if effective_bool(changes, current, WELCOME_ENABLED) != Some(false) {
        return;
    }
    for path in WELCOME_MEMBERS {
        clear(changes, current, path, "custom welcome email is disabled");
    }
}

/// Cookieless embedding needs embedding to be licensed.
fn cookieless_embed(changes: &ChangeSet, current: &Value) -> Result<(), CoreError> {
    if effective_bool(changes, current, COOKIELESS) != Some(true) {
        return Ok(());
    }

    let embed_enabled = changes
        .declared(EMBED_ENABLED)
        .filter(|v| !v.is_null())
        .or_else(|| value_at(current, EMBED_ENABLED))
        .and_then(Value::as_bool);
    if embed_enabled == Some(false) {
        return Err(CoreError::validation(
            COOKIELESS,
            "true",
            format!("cannot be set to true when {EMBED_ENABLED} is false"),
        ));
    }
    Ok(())
}

fn effective_bool(changes: &ChangeSet, current: &Value, path: &str) -> Option<bool> {
    changes
        .staged(path)
        .or_else(|| value_at(current, path))
        .and_then(Value::as_bool)
}

/// Drop `path` from the write. Recorded as cleared only when something was
/// actually there to drop.
fn clear(changes: &mut ChangeSet, current: &Value, path: &'static str, reason: &'static str) {
    let dropped = changes.unstage(path);
    if let Some(change) = &dropped {
        warn!(path, value = %compact(&change.new), reason, "dropping configured setting");
    }

    let on_server = value_at(current, path).is_some_and(|v| v.as_str() != Some(""));
    if dropped.is_some() || on_server {
        changes.mark_cleared(path, FieldGroup::CustomWelcomeEmail, reason);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::setting::changes::{diff, GroupState};
    use crate::setting::desired::DesiredSettings;

    fn plan(current: &Value, desired: &Value) -> Result<ChangeSet, CoreError> {
        let desired = DesiredSettings::from_json(desired).unwrap();
        let mut set = diff(current, &desired);
        apply_constraints(&mut set, current)?;
        Ok(set)
    }

    #[test]
    fn subject_rejected_without_advanced() {
        let err = plan(
            &json!({ "privatelabel_configuration": { "custom_welcome_email_advanced": false } }),
            &json!({ "custom_welcome_email": { "enabled": true, "subject": "Welcome!" } }),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "custom_welcome_email.subject cannot be set when \
             privatelabel_configuration.custom_welcome_email_advanced is false (was \"Welcome!\")"
        );
    }

    #[test]
    fn staged_advanced_flag_counts() {
        let set = plan(
            &json!({ "privatelabel_configuration": { "custom_welcome_email_advanced": false } }),
            &json!({
                "privatelabel_configuration": { "custom_welcome_email_advanced": true },
                "custom_welcome_email": { "enabled": true, "subject": "Welcome!" }
            }),
        )
        .unwrap();
        assert_eq!(set.staged("custom_welcome_email.subject"), Some(&json!("Welcome!")));
    }

    #[test]
    fn advanced_off_clears_server_header() {
        let set = plan(
            &json!({
                "privatelabel_configuration": { "custom_welcome_email_advanced": false },
                "custom_welcome_email": { "enabled": true, "header": "Old header" }
            }),
            &json!({ "custom_welcome_email": { "content": "<p>hi</p>" } }),
        )
        .unwrap();

        let cleared: Vec<_> = set.cleared().iter().map(|c| c.path).collect();
        assert_eq!(cleared, vec!["custom_welcome_email.header"]);
        assert_eq!(
            set.group_state(FieldGroup::CustomWelcomeEmail),
            GroupState::ServerConstrainedCleared
        );
        assert!(set.staged("custom_welcome_email.content").is_some());
    }

    #[test]
    fn disabled_welcome_email_drops_content() {
        let set = plan(
            &json!({ "custom_welcome_email": { "enabled": true } }),
            &json!({ "custom_welcome_email": { "enabled": false, "content": "<p>hi</p>" } }),
        )
        .unwrap();

        assert_eq!(set.staged("custom_welcome_email.content"), None);
        assert_eq!(set.staged("custom_welcome_email.enabled"), Some(&json!(false)));
        assert_eq!(set.cleared().len(), 1);
    }

    #[test]
    fn advanced_check_runs_before_enabled_check() {
        let err = plan(
            &json!({ "privatelabel_configuration": { "custom_welcome_email_advanced": false } }),
            &json!({ "custom_welcome_email": { "enabled": false, "subject": "Hi" } }),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "custom_welcome_email.subject"));
    }

    #[test]
    fn empty_subject_is_allowed_without_advanced() {
        let set = plan(
            &json!({ "privatelabel_configuration": { "custom_welcome_email_advanced": false } }),
            &json!({ "custom_welcome_email": { "subject": "" } }),
        )
        .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn cookieless_needs_embedding() {
        let err = plan(
            &json!({ "embed_config": { "embed_enabled": false } }),
            &json!({ "embed_config": { "embed_cookieless_v2": true } }),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "embed_config.embed_cookieless_v2 cannot be set to true when \
             embed_config.embed_enabled is false (was true)"
        );
    }

    #[test]
    fn cookieless_falls_back_to_declared_embed_flag() {
        let err = plan(
            &json!({}),
            &json!({ "embed_config": { "embed_cookieless_v2": true, "embed_enabled": false } }),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("embed_config.embed_cookieless_v2"));

        plan(
            &json!({ "embed_config": { "embed_enabled": true } }),
            &json!({ "embed_config": { "embed_cookieless_v2": true } }),
        )
        .unwrap();
    }

    #[test]
    fn declared_embed_flag_wins_over_server() {
        let err = plan(
            &json!({ "embed_config": { "embed_enabled": true } }),
            &json!({ "embed_config": { "embed_cookieless_v2": true, "embed_enabled": false } }),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == COOKIELESS));
    }

    #[test]
    fn advanced_off_alone_still_records_server_subject() {
        let set = plan(
            &json!({
                "privatelabel_configuration": { "custom_welcome_email_advanced": true },
                "custom_welcome_email": { "enabled": true, "subject": "Old subject" }
            }),
            &json!({ "privatelabel_configuration": { "custom_welcome_email_advanced": false } }),
        )
        .unwrap();

        let cleared: Vec<_> = set.cleared().iter().map(|c| c.path).collect();
        assert_eq!(cleared, vec!["custom_welcome_email.subject"]);
        assert!(!set.has_group_changes(FieldGroup::CustomWelcomeEmail));
    }
}
