//! Entity descriptors and the type handles they reference.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeDescriptor;
use super::manager::EntityManager;

/// Handle naming the backing record type of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelType(String);

impl ModelType {
    /// Create a model handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Handle naming the manager type of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerType(String);

impl ManagerType {
    /// Create a manager handle.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ManagerType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ManagerType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A loaded entity: name, backing model, table and manager.
///
/// Descriptors are created by the registry at load time and never change
/// afterwards. Cloning is cheap; the manager instance is shared.
#[derive(Clone)]
pub struct EntityDescriptor {
    name: String,
    package: String,
    model: ModelType,
    table: String,
    manager_type: ManagerType,
    manager: Arc<dyn EntityManager>,
}

impl EntityDescriptor {
    /// Create a descriptor.
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        model: ModelType,
        table: impl Into<String>,
        manager_type: ManagerType,
        manager: Arc<dyn EntityManager>,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            model,
            table: table.into(),
            manager_type,
            manager,
        }
    }

    /// Entity name (unique within the registry).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package that declared this entity.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Backing model type.
    pub fn model(&self) -> &ModelType {
        &self.model
    }

    /// Storage table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Manager type handle.
    pub fn manager_type(&self) -> &ManagerType {
        &self.manager_type
    }

    /// Shared manager instance.
    pub fn manager(&self) -> &Arc<dyn EntityManager> {
        &self.manager
    }

    /// Attributes declared by the manager.
    pub fn attributes(&self) -> Vec<AttributeDescriptor> {
        self.manager.attributes()
    }

    /// Name stored in polymorphic type columns for this entity.
    pub fn morph_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("package", &self.package)
            .field("model", &self.model)
            .field("table", &self.table)
            .field("manager_type", &self.manager_type)
            .finish_non_exhaustive()
    }
}
