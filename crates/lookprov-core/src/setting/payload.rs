// Outgoing PATCH body.

use lookprov_api::models::Setting;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use super::changes::{value_at, ChangeSet};
use super::fields::{self, Access, FieldGroup};
use crate::error::CoreError;

/// Build the partial update for a settled change set.
///
/// Top-level scalars go out one by one. The server replaces a nested group
/// wholesale, so a group with any staged member, or one a constraint
/// cleared members from, is sent complete: the fetched members minus
/// read-only and null ones, overlaid with the staged values, minus anything
/// a constraint cleared. A staged `null` goes out as JSON `null`. Returns
/// `None` when there is nothing to send.
pub fn build_payload(changes: &ChangeSet, current: &Value) -> Result<Option<Setting>, CoreError> {
    let mut body = Map::new();

    for change in changes.changes().iter().filter(|c| c.group == FieldGroup::Scalar) {
        body.insert(change.path.to_owned(), change.new.clone());
    }

    for group in FieldGroup::iter() {
        let Some(key) = group.key() else { continue };
        let clears_server_value = changes
            .cleared()
            .iter()
            .any(|c| c.group == group && value_at(current, c.path).is_some());
        if !changes.has_group_changes(group) && !clears_server_value {
            continue;
        }

        let mut members = match value_at(current, key) {
            Some(Value::Object(fetched)) => fetched.clone(),
            _ => Map::new(),
        };
        members.retain(|name, value| {
            !value.is_null()
                && fields::lookup(&format!("{key}.{name}")).is_some_and(|f| f.access == Access::ReadWrite)
        });

        for change in changes.changes().iter().filter(|c| c.group == group) {
            members.insert(leaf(change.path).to_owned(), change.new.clone());
        }
        for cleared in changes.cleared().iter().filter(|c| c.group == group) {
            members.remove(leaf(cleared.path));
        }

        body.insert(key.to_owned(), Value::Object(members));
    }

    if body.is_empty() {
        return Ok(None);
    }

    let mut setting: Setting = serde_json::from_value(Value::Object(body))
        .map_err(|e| CoreError::Internal(format!("settings payload does not fit the wire model: {e}")))?;
    setting.strip_read_only();
    Ok(Some(setting))
}

fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
