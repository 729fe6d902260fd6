// Caller-declared setting values.
//
// A desired-settings document mirrors the wire shape: top-level scalars
// plus one table per nested group. Every leaf is checked against the field
// table on the way in, so typos and type mismatches fail before any call.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::fields::{self, FieldGroup, FieldSpec};
use crate::error::CoreError;
use crate::schema::AttrType;

/// Configured values keyed by dotted field path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredSettings {
    values: BTreeMap<&'static str, Value>,
}

impl DesiredSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a nested document such as
    /// `{"timezone": "UTC", "embed_config": {"look_filters": true}}`.
    ///
    /// A `null` leaf asks for the field to be cleared. A `null` group is
    /// the same as leaving the group out.
    pub fn from_json(doc: &Value) -> Result<Self, CoreError> {
        let Value::Object(top) = doc else {
            return Err(CoreError::validation(
                "settings",
                compact(doc),
                "must be a table of setting values",
            ));
        };

        let mut desired = Self::new();
        for (key, value) in top {
            match (FieldGroup::from_key(key), value) {
                (Some(_), Value::Null) => {}
                (Some(_), Value::Object(members)) => {
                    for (name, member) in members {
                        desired.set(&format!("{key}.{name}"), member.clone())?;
                    }
                }
                (Some(_), other) => {
                    return Err(CoreError::validation(
                        key.clone(),
                        compact(other),
                        "must be a table of group members",
                    ));
                }
                (None, _) => {
                    desired.set(key, value.clone())?;
                }
            }
        }
        Ok(desired)
    }

    /// Declare one value by dotted path. `null` declares a clear.
    pub fn set(&mut self, path: &str, value: Value) -> Result<&mut Self, CoreError> {
        let spec = fields::lookup(path).ok_or_else(|| {
            CoreError::validation(path, compact(&value), "is not a known setting")
        })?;

        if !value.is_null() && !matches_kind(spec.kind, &value) {
            return Err(CoreError::validation(
                path,
                compact(&value),
                format!("must be of type {}", spec.kind),
            ));
        }
        if let Some(message) = spec.deprecated {
            warn!(path, "setting is deprecated: {message}");
        }

        self.values.insert(spec.path, value);
        Ok(self)
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Result<Self, CoreError> {
        self.set(path, value.into())?;
        Ok(self)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Declared values with their field rows, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &Value)> {
        self.values
            .iter()
            .filter_map(|(path, value)| fields::lookup(path).map(|spec| (spec, value)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'de> Deserialize<'de> for DesiredSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        Self::from_json(&doc).map_err(serde::de::Error::custom)
    }
}

fn matches_kind(kind: AttrType, value: &Value) -> bool {
    match kind {
        AttrType::Bool => value.is_boolean(),
        AttrType::String => value.is_string(),
        AttrType::Int => value.is_i64() || value.is_u64(),
        AttrType::StringList | AttrType::StringSet => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        AttrType::Map | AttrType::Block => value.is_object(),
    }
}

pub(crate) fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn nested_document_flattens_to_paths() {
        let desired = DesiredSettings::from_json(&json!({
            "timezone": "UTC",
            "host_url": null,
            "embed_config": { "look_filters": true, "domain_allowlist": ["a.example"] }
        }))
        .unwrap();

        let paths: Vec<_> = desired.iter().map(|(spec, _)| spec.path).collect();
        assert_eq!(
            paths,
            vec![
                "embed_config.domain_allowlist",
                "embed_config.look_filters",
                "host_url",
                "timezone"
            ]
        );
        assert_eq!(desired.get("timezone"), Some(&json!("UTC")));
        assert_eq!(desired.get("host_url"), Some(&Value::Null));
    }

    #[test]
    fn null_group_is_not_configured() {
        let desired = DesiredSettings::from_json(&json!({ "embed_config": null })).unwrap();
        assert!(desired.is_empty());
    }

    #[test]
    fn unknown_setting_is_rejected() {
        let err = DesiredSettings::from_json(&json!({ "timezon": "UTC" })).unwrap_err();
        assert_eq!(err.to_string(), "timezon is not a known setting (was \"UTC\")");
    }

    #[test]
    fn type_mismatch_names_expected_type() {
        let err = DesiredSettings::new()
            .with("custom_welcome_email.enabled", "yes")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "custom_welcome_email.enabled must be of type bool (was \"yes\")"
        );
    }

    #[test]
    fn group_must_be_a_table() {
        let err = DesiredSettings::from_json(&json!({ "embed_config": true })).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "embed_config"));
    }

    #[test]
    fn deserializes_from_toml_shaped_input() {
        let desired: DesiredSettings = serde_json::from_value(json!({
            "privatelabel_configuration": { "custom_welcome_email_advanced": false }
        }))
        .unwrap();
        assert_eq!(desired.len(), 1);
    }
}
