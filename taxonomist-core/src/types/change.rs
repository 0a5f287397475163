//! Field-level change entries recorded in the version log

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Value of a tracked taxon field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("nil"),
            FieldValue::Text(text) => write!(f, "{:?}", text),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// One entry of a diff between two taxon snapshots.
///
/// Serialized as `["+", field, new]`, `["-", field, old]` or
/// `["~", field, old, new]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEntry {
    Added {
        field: String,
        new_value: FieldValue,
    },
    Removed {
        field: String,
        old_value: FieldValue,
    },
    Changed {
        field: String,
        old_value: FieldValue,
        new_value: FieldValue,
    },
}

impl ChangeEntry {
    pub const ADDED: &'static str = "+";
    pub const REMOVED: &'static str = "-";
    pub const CHANGED: &'static str = "~";

    pub fn added(field: impl Into<String>, new_value: FieldValue) -> Self {
        ChangeEntry::Added {
            field: field.into(),
            new_value,
        }
    }

    pub fn removed(field: impl Into<String>, old_value: FieldValue) -> Self {
        ChangeEntry::Removed {
            field: field.into(),
            old_value,
        }
    }

    pub fn changed(field: impl Into<String>, old_value: FieldValue, new_value: FieldValue) -> Self {
        ChangeEntry::Changed {
            field: field.into(),
            old_value,
            new_value,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            ChangeEntry::Added { .. } => Self::ADDED,
            ChangeEntry::Removed { .. } => Self::REMOVED,
            ChangeEntry::Changed { .. } => Self::CHANGED,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ChangeEntry::Added { field, .. }
            | ChangeEntry::Removed { field, .. }
            | ChangeEntry::Changed { field, .. } => field,
        }
    }

    pub fn old_value(&self) -> Option<&FieldValue> {
        match self {
            ChangeEntry::Added { .. } => None,
            ChangeEntry::Removed { old_value, .. } | ChangeEntry::Changed { old_value, .. } => {
                Some(old_value)
            }
        }
    }

    pub fn new_value(&self) -> Option<&FieldValue> {
        match self {
            ChangeEntry::Removed { .. } => None,
            ChangeEntry::Added { new_value, .. } | ChangeEntry::Changed { new_value, .. } => {
                Some(new_value)
            }
        }
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEntry::Added { field, new_value } => write!(f, "+ {}: {}", field, new_value),
            ChangeEntry::Removed { field, old_value } => write!(f, "- {}: {}", field, old_value),
            ChangeEntry::Changed {
                field,
                old_value,
                new_value,
            } => write!(f, "~ {}: {} -> {}", field, old_value, new_value),
        }
    }
}

impl Serialize for ChangeEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChangeEntry::Added { field, new_value } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(Self::ADDED)?;
                seq.serialize_element(field)?;
                seq.serialize_element(new_value)?;
                seq.end()
            }
            ChangeEntry::Removed { field, old_value } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(Self::REMOVED)?;
                seq.serialize_element(field)?;
                seq.serialize_element(old_value)?;
                seq.end()
            }
            ChangeEntry::Changed {
                field,
                old_value,
                new_value,
            } => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                seq.serialize_element(Self::CHANGED)?;
                seq.serialize_element(field)?;
                seq.serialize_element(old_value)?;
                seq.serialize_element(new_value)?;
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ChangeEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut parts: Vec<FieldValue> = Vec::deserialize(deserializer)?;

        let (op, field) = match (parts.first(), parts.get(1)) {
            (Some(FieldValue::Text(op)), Some(FieldValue::Text(field))) => {
                (op.clone(), field.clone())
            }
            _ => return Err(D::Error::custom("change entry must start with [op, field]")),
        };
        let values: Vec<FieldValue> = parts.drain(2..).collect();

        match (op.as_str(), values.len()) {
            (Self::ADDED, 1) => Ok(ChangeEntry::added(field, values[0].clone())),
            (Self::REMOVED, 1) => Ok(ChangeEntry::removed(field, values[0].clone())),
            (Self::CHANGED, 2) => Ok(ChangeEntry::changed(
                field,
                values[0].clone(),
                values[1].clone(),
            )),
            (op, n) => Err(D::Error::custom(format!(
                "unsupported change entry '{}' with {} value(s)",
                op, n
            ))),
        }
    }
}
