// ── Attribute schemas ──
//
// The boundary a host runtime sees: one flat or one-level-nested attribute
// list per resource type, with presence and sensitivity markers and
// mutual-exclusion groups.

use serde::Serialize;

use crate::error::CoreError;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttrType {
    String,
    Bool,
    Int,
    StringList,
    StringSet,
    Map,
    Block,
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Presence {
    /// Must be configured.
    Required,
    /// May be configured; absent means "leave alone".
    Optional,
    /// Set by the server only.
    Computed,
    /// May be configured; the server fills it in otherwise.
    OptionalComputed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    pub presence: Presence,
    pub description: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub write_only: bool,
    /// Changing the value requires destroying and re-creating the object.
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<Attribute>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl Attribute {
    pub fn new(
        name: &'static str,
        attr_type: AttrType,
        presence: Presence,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attr_type,
            presence,
            description,
            sensitive: false,
            write_only: false,
            force_new: false,
            deprecated: None,
            nested: Vec::new(),
        }
    }

    pub fn required(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Presence::Required, description)
    }

    pub fn optional(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Presence::Optional, description)
    }

    pub fn computed(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Presence::Computed, description)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    pub fn with_nested(mut self, nested: Vec<Attribute>) -> Self {
        self.nested = nested;
        self
    }
}

/// Attribute schema of one resource or data source type.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exactly_one_of: Vec<Vec<&'static str>>,
}

impl Schema {
    pub fn new(type_name: &'static str, description: &'static str) -> Self {
        Self {
            type_name,
            description,
            attributes: Vec::new(),
            exactly_one_of: Vec::new(),
        }
    }

    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Declare a mutual-exclusion group: exactly one member must be set.
    pub fn exactly_one_of(mut self, group: &[&'static str]) -> Self {
        self.exactly_one_of.push(group.to_vec());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check every mutual-exclusion group against the set attribute names.
    pub fn check_exactly_one_of(&self, present: &[&str]) -> Result<(), CoreError> {
        for group in &self.exactly_one_of {
            let set: Vec<&str> = group
                .iter()
                .copied()
                .filter(|name| present.contains(name))
                .collect();
            if set.len() != 1 {
                let value = if set.is_empty() {
                    "none set".to_owned()
                } else {
                    set.join(", ")
                };
                return Err(CoreError::validation(
                    format!("{}: {}", self.type_name, group.join(" / ")),
                    value,
                    "requires exactly one of these attributes",
                ));
            }
        }
        Ok(())
    }
}
