//! Three-state optional for PATCH-style payloads.
//!
//! `Option<T>` cannot tell "leave this field alone" from "clear this field".
//! [`Nullable`] can: `Unset` is skipped on the wire, `Null` is sent as JSON
//! `null`, and `Value` is sent as-is. On the way in, a missing key decodes to
//! `Unset` and an explicit `null` decodes to `Null`.
//!
//! Fields must carry
//! `#[serde(default, skip_serializing_if = "Nullable::is_unset")]` for the
//! missing-key half of the contract to hold.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nullable<T> {
    /// Not present. Omitted when serializing.
    Unset,
    /// Present as JSON `null`.
    Null,
    /// Present with a value.
    Value(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Nullable<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Self::Unset => Nullable::Unset,
            Self::Null => Nullable::Null,
            Self::Value(v) => Nullable::Value(v),
        }
    }

    pub fn as_mut(&mut self) -> Nullable<&mut T> {
        match self {
            Self::Unset => Nullable::Unset,
            Self::Null => Nullable::Null,
            Self::Value(v) => Nullable::Value(v),
        }
    }

    /// Collapse `Unset` and `Null` into `None`.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Null => None,
        }
    }

    /// Borrowing form of [`value`](Self::value).
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Null => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
        match self {
            Self::Unset => Nullable::Unset,
            Self::Null => Nullable::Null,
            Self::Value(v) => Nullable::Value(f(v)),
        }
    }

    /// Replace with `Unset`, returning the previous state.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            // `Unset` only reaches here when the field forgot its
            // `skip_serializing_if`; null is the closest honest answer.
            Self::Unset | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::Nullable;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, skip_serializing_if = "Nullable::is_unset")]
        title: Nullable<String>,
        #[serde(default, skip_serializing_if = "Nullable::is_unset")]
        enabled: Nullable<bool>,
    }

    #[test]
    fn missing_null_and_value_decode_distinctly() {
        let p: Patch = serde_json::from_value(json!({ "title": null, "enabled": true })).unwrap();
        assert_eq!(p.title, Nullable::Null);
        assert_eq!(p.enabled, Nullable::Value(true));

        let p: Patch = serde_json::from_value(json!({})).unwrap();
        assert!(p.title.is_unset());
        assert!(p.enabled.is_unset());
    }

    #[test]
    fn unset_is_omitted_and_null_is_sent() {
        let p = Patch {
            title: Nullable::Null,
            enabled: Nullable::Unset,
        };
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({ "title": null }));

        let p = Patch {
            title: Nullable::Value("Acme".into()),
            enabled: Nullable::Value(false),
        };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({ "title": "Acme", "enabled": false })
        );
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(Nullable::from(None::<u8>), Nullable::Null);
        assert_eq!(Nullable::from(Some(3)), Nullable::Value(3));
        assert_eq!(Nullable::Value(3).value(), Some(3));
        assert_eq!(Nullable::<u8>::Null.value(), None);
    }
}
