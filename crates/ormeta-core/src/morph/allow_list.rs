//! Allow-list buckets for polymorphic attributes.

use std::collections::HashMap;
use std::fmt;

use crate::registry::ModelType;

/// Something that may be allowed on a morph attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MorphCandidate {
    /// A model type handle, used as-is.
    Model(ModelType),
    /// An entity name, resolved to its model type through the registry.
    Entity(String),
}

impl MorphCandidate {
    /// String form used as the default alias.
    pub fn as_str(&self) -> &str {
        match self {
            MorphCandidate::Model(model) => model.as_str(),
            MorphCandidate::Entity(name) => name,
        }
    }
}

impl fmt::Display for MorphCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ModelType> for MorphCandidate {
    fn from(model: ModelType) -> Self {
        MorphCandidate::Model(model)
    }
}

impl From<&ModelType> for MorphCandidate {
    fn from(model: &ModelType) -> Self {
        MorphCandidate::Model(model.clone())
    }
}

impl From<&str> for MorphCandidate {
    fn from(name: &str) -> Self {
        MorphCandidate::Entity(name.to_string())
    }
}

impl From<String> for MorphCandidate {
    fn from(name: String) -> Self {
        MorphCandidate::Entity(name)
    }
}

/// Aliases allowed per morph attribute, keyed by configuration path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorphAllowList {
    buckets: HashMap<String, Vec<String>>,
}

impl MorphAllowList {
    /// Create an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an alias is in a bucket.
    pub fn contains(&self, key: &str, alias: &str) -> bool {
        self.buckets
            .get(key)
            .is_some_and(|aliases| aliases.iter().any(|a| a == alias))
    }

    /// Append an alias to a bucket unless present. Returns whether it was added.
    pub fn insert(&mut self, key: &str, alias: &str) -> bool {
        if self.contains(key, alias) {
            return false;
        }
        self.buckets
            .entry(key.to_string())
            .or_default()
            .push(alias.to_string());
        true
    }

    /// Aliases in a bucket, in registration order.
    pub fn aliases(&self, key: &str) -> &[String] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing is allowed anywhere.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
