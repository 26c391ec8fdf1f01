//! Key-by-key descent into the metadata tree.
use serde_json::{Map, Value};

use super::shape::kind_name;
use crate::error::SchemaError;

/// A borrowed object node of the metadata tree, together with its location.
///
/// The location is only used for diagnostics: it renders the key path from
/// the document root, e.g. `AWS::CloudFormation::Init.config.files["/etc/motd"]`.
#[derive(Debug, Clone)]
pub struct DirectiveNode<'a> {
    location: String,
    entries: &'a Map<String, Value>,
}

impl<'a> DirectiveNode<'a> {
    /// Wrap `value` as the root node.
    ///
    /// Returns `None` when `value` is not an object.
    #[must_use]
    pub fn root(value: &'a Value) -> Option<Self> {
        value.as_object().map(|entries| Self {
            location: String::new(),
            entries,
        })
    }

    /// Wrap an object found at `location`.
    #[must_use]
    pub fn at(location: impl Into<String>, entries: &'a Map<String, Value>) -> Self {
        Self {
            location: location.into(),
            entries,
        }
    }

    /// Descend into the object stored under `key`.
    ///
    /// A missing key (or an explicit `null`) is absence, not an error: the
    /// caller decides whether absence means "nothing to do" or a hard failure.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when `key` exists but does not hold an object.
    pub fn descend(&self, key: &str) -> Result<Option<Self>, SchemaError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let location = self.child_location(key);
        match value {
            Value::Object(entries) => Ok(Some(Self { location, entries })),
            other => Err(SchemaError::new(location, "object", kind_name(other))),
        }
    }

    /// Descend through a sequence of keys, stopping at the first absent one.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when any present step is not an object.
    pub fn descend_path(&self, keys: &[&str]) -> Result<Option<Self>, SchemaError> {
        let mut node = self.clone();
        for key in keys {
            match node.descend(key)? {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// Return the value stored under `key`, treating `null` as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries.get(key).filter(|v| !v.is_null())
    }

    /// Iterate over all `(key, value)` pairs of this node.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + use<'a> {
        self.entries.iter()
    }

    /// Number of keys in this node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this node has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location of this node from the document root.
    #[must_use]
    pub fn location(&self) -> &str {
        if self.location.is_empty() {
            "<root>"
        } else {
            &self.location
        }
    }

    /// Location of the child stored under `key`.
    ///
    /// Keys that are plain identifiers are joined with `.`; anything else
    /// (paths, dotted names) is rendered as `["key"]`.
    #[must_use]
    pub fn child_location(&self, key: &str) -> String {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'));
        match (self.location.is_empty(), plain) {
            (true, true) => key.to_string(),
            (false, true) => format!("{}.{key}", self.location),
            (_, false) => format!("{}[{key:?}]", self.location),
        }
    }
}
