//! The run's typed parameter mapping.
//!
//! A [`Context`] maps parameter names to [`ParameterValue`]s. Once a name is
//! written its kind is fixed: later writes or typed reads of another kind
//! fail with [`DomainError::ParameterKindMismatch`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// The three value kinds a parameter can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "stringArray")]
    StringList,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::StringList => write!(f, "stringArray"),
        }
    }
}

/// A tagged parameter value. Serializes as a bare JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Bool(_) => ParameterKind::Bool,
            Self::String(_) => ParameterKind::String,
            Self::StringList(_) => ParameterKind::StringList,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::StringList(list) => write!(f, "{}", list.join(", ")),
        }
    }
}

/// Name → value mapping driving every substitution in a run.
///
/// Cloning a context (see [`Context::snapshot`]) gives an independent copy:
/// writes to the snapshot never reach the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, ParameterValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed read of a boolean. `Ok(None)` when unset.
    pub fn bool(&self, name: &str) -> Result<Option<bool>, DomainError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ParameterValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(name, ParameterKind::Bool, other.kind())),
        }
    }

    /// Typed read of a string. `Ok(None)` when unset.
    pub fn string(&self, name: &str) -> Result<Option<&str>, DomainError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ParameterValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(mismatch(name, ParameterKind::String, other.kind())),
        }
    }

    /// Typed read of a string list. `Ok(None)` when unset.
    pub fn string_list(&self, name: &str) -> Result<Option<&[String]>, DomainError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ParameterValue::StringList(list)) => Ok(Some(list.as_slice())),
            Some(other) => Err(mismatch(name, ParameterKind::StringList, other.kind())),
        }
    }

    /// Write a value, refusing to change the kind of an existing entry.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.values.get(&name) {
            if existing.kind() != value.kind() {
                return Err(mismatch(&name, value.kind(), existing.kind()));
            }
        }
        self.values.insert(name, value);
        Ok(())
    }

    /// Independent copy for a branch of work.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Overlay every entry of `other` onto `self`.
    pub fn merge(&mut self, other: &Context) -> Result<(), DomainError> {
        for (name, value) in &other.values {
            self.set(name.clone(), value.clone())?;
        }
        Ok(())
    }

    /// All boolean entries; the environment for dependency conditions.
    pub fn bools(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().filter_map(|(k, v)| match v {
            ParameterValue::Bool(b) => Some((k.as_str(), *b)),
            _ => None,
        })
    }

    /// All string entries, sorted by name.
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().filter_map(|(k, v)| match v {
            ParameterValue::String(s) => Some((k.as_str(), s.as_str())),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, ParameterValue)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, ParameterValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn mismatch(name: &str, requested: ParameterKind, actual: ParameterKind) -> DomainError {
    DomainError::ParameterKindMismatch {
        name: name.to_owned(),
        requested: requested.to_string(),
        actual: actual.to_string(),
    }
}
