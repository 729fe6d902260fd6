// Field-level diff between fetched settings and the declared values.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::desired::DesiredSettings;
use super::fields::{Access, FieldGroup};

/// Where a group stands once the plan is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupState {
    #[default]
    Unchanged,
    /// At least one member differs from the server.
    LocallyModified,
    /// A cross-field rule forced one or more members to be dropped.
    ServerConstrainedCleared,
}

/// One staged field write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub path: &'static str,
    pub group: FieldGroup,
    /// Server value, `None` when unset or never returned.
    pub old: Option<Value>,
    pub new: Value,
}

/// A member dropped from the outgoing write by a cross-field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cleared {
    pub path: &'static str,
    pub group: FieldGroup,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
    cleared: Vec<Cleared>,
    groups: BTreeMap<FieldGroup, GroupState>,
    /// Everything the caller declared, read-only values included.
    #[serde(skip)]
    declared: BTreeMap<&'static str, Value>,
}

impl ChangeSet {
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn cleared(&self) -> &[Cleared] {
        &self.cleared
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn group_state(&self, group: FieldGroup) -> GroupState {
        self.groups.get(&group).copied().unwrap_or_default()
    }

    pub fn staged(&self, path: &str) -> Option<&Value> {
        self.changes.iter().find(|c| c.path == path).map(|c| &c.new)
    }

    /// The caller's value for `path`, whether or not it produced a change.
    pub fn declared(&self, path: &str) -> Option<&Value> {
        self.declared.get(path)
    }

    pub fn has_group_changes(&self, group: FieldGroup) -> bool {
        self.changes.iter().any(|c| c.group == group)
    }

    pub(crate) fn stage(&mut self, change: Change) {
        self.groups.insert(change.group, GroupState::LocallyModified);
        self.changes.push(change);
    }

    /// Remove the staged write for `path`, returning it.
    pub(crate) fn unstage(&mut self, path: &str) -> Option<Change> {
        let idx = self.changes.iter().position(|c| c.path == path)?;
        Some(self.changes.remove(idx))
    }

    pub(crate) fn mark_cleared(&mut self, path: &'static str, group: FieldGroup, reason: &'static str) {
        self.groups.insert(group, GroupState::ServerConstrainedCleared);
        self.cleared.push(Cleared { path, group, reason });
    }
}

/// Compare declared values to the fetched working copy.
///
/// Read-only declarations are kept for the constraint rules but never
/// staged. Write-only fields are never returned by the server, so a
/// declared one is always staged unless it is `null`. A `null` for a
/// read-write field is staged only while the server holds a value.
pub fn diff(current: &Value, desired: &DesiredSettings) -> ChangeSet {
    let mut set = ChangeSet::default();

    for (spec, value) in desired.iter() {
        set.declared.insert(spec.path, value.clone());

        let old = value_at(current, spec.path).cloned();
        let changed = match spec.access {
            Access::ReadOnly => false,
            Access::WriteOnly => !value.is_null(),
            Access::ReadWrite if value.is_null() => old.is_some(),
            Access::ReadWrite => old.as_ref() != Some(value),
        };
        if changed {
            set.stage(Change {
                path: spec.path,
                group: spec.group,
                old,
                new: value.clone(),
            });
        }
    }

    set
}

/// Resolve a dotted path. JSON `null` counts as absent.
pub(crate) fn value_at<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |node, segment| node.get(segment))
        .filter(|v| !v.is_null())
}
