//! Typed requests and their flat field representation.
//!
//! Fishbowl request nodes are flat: one element per field, in a fixed order.
//! A [`Request`] maps itself to and from an ordered [`Fields`] list; the
//! codec crate is responsible for turning that list into XML.

use core::str::FromStr;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Ordered `(element name, text)` pairs of a request or response node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    /// Builder form of [`Fields::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// First value for `name`. Lookup is case-insensitive, like the server.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn require(&self, name: &str) -> DomainResult<&str> {
        self.get(name).ok_or_else(|| DomainError::missing_field(name))
    }

    /// Parse a required field, reporting the field name on failure.
    pub fn parse<T>(&self, name: &str) -> DomainResult<T>
    where
        T: FromStr,
        T::Err: core::fmt::Display,
    {
        let raw = self.require(name)?;
        raw.trim()
            .parse::<T>()
            .map_err(|e| DomainError::validation(format!("{name}: {e}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// A typed request the server understands.
pub trait Request: ValueObject + Sized {
    /// Element name of the request node, e.g. `AddInventoryRq`.
    const REQUEST_NODE: &'static str;

    /// Element name of the matching response node, e.g. `AddInventoryRs`.
    const RESPONSE_NODE: &'static str;

    /// Short label used in audit log lines.
    const AUDIT_LABEL: &'static str;

    /// Fields in the order the server expects them.
    fn to_fields(&self) -> Fields;

    /// Rebuild the request from decoded fields, re-running validation.
    fn from_fields(fields: &Fields) -> DomainResult<Self>;
}
