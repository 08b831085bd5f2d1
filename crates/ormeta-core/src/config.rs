//! Registry configuration.
//!
//! The configuration tree maps each package to the entities it declares:
//!
//! ```json
//! {
//!   "shop": {
//!     "data": {
//!       "order": {
//!         "model": "shop::Order",
//!         "table": "orders",
//!         "manager": "shop::OrderManager",
//!         "attributes": [{ "name": "total", "kind": "number", "fillable": true }]
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Raw JSON is validated once into [`RegistryConfig`]; nothing downstream
//! re-reads the raw tree. Package and entity order follow the document.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::registry::{AttributeDescriptor, ManagerType, ModelType};

/// Validated registry configuration: packages in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryConfig {
    packages: Vec<PackageConfig>,
}

/// Entities declared by one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageConfig {
    /// Package identifier.
    pub id: String,
    /// Entity declarations in document order.
    pub entities: Vec<EntityConfig>,
}

/// One entity declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityConfig {
    /// Entity name.
    pub name: String,
    /// Backing model type.
    pub model: ModelType,
    /// Storage table.
    pub table: String,
    /// Manager type.
    pub manager: ManagerType,
    /// Inline attribute declarations, used when no manager constructor is registered.
    pub attributes: Option<Vec<AttributeDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    #[serde(default)]
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    model: Option<String>,
    table: Option<String>,
    manager: Option<String>,
    #[serde(default)]
    attributes: Option<Vec<AttributeDescriptor>>,
}

impl RegistryConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package (builder style).
    pub fn with_package(mut self, package: PackageConfig) -> Self {
        self.packages.push(package);
        self
    }

    /// Packages in declaration order.
    pub fn packages(&self) -> &[PackageConfig] {
        &self.packages
    }

    /// Total number of entity declarations, duplicates included.
    pub fn entity_count(&self) -> usize {
        self.packages.iter().map(|p| p.entities.len()).sum()
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate an already-parsed JSON tree.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(Error::InvalidConfig(
                "configuration root must be an object of packages".to_string(),
            ));
        };

        let mut config = Self::new();
        for (package_id, package_value) in root {
            let raw: RawPackage = serde_json::from_value(package_value).map_err(|e| {
                Error::InvalidConfig(format!("package `{package_id}`: {e}"))
            })?;

            let mut package = PackageConfig::new(package_id.as_str());
            for (entity_name, entity_value) in raw.data {
                let raw: RawEntity = serde_json::from_value(entity_value).map_err(|e| {
                    Error::InvalidConfig(format!(
                        "entity `{entity_name}` in package `{package_id}`: {e}"
                    ))
                })?;
                package
                    .entities
                    .push(raw.validate(&package_id, entity_name)?);
            }
            config.packages.push(package);
        }

        Ok(config)
    }
}

impl RawEntity {
    fn validate(self, package: &str, name: String) -> Result<EntityConfig> {
        let required = |value: Option<String>, key: &str| -> Result<String> {
            value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "entity `{name}` in package `{package}` is missing required key `{key}`"
                ))
            })
        };

        let model = required(self.model, "model")?;
        let table = required(self.table, "table")?;
        let manager = required(self.manager, "manager")?;

        Ok(EntityConfig {
            model: ModelType::new(model),
            table,
            manager: ManagerType::new(manager),
            attributes: self.attributes,
            name,
        })
    }
}

impl PackageConfig {
    /// Create an empty package.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entities: Vec::new(),
        }
    }

    /// Add an entity (builder style).
    pub fn with_entity(mut self, entity: EntityConfig) -> Self {
        self.entities.push(entity);
        self
    }
}

impl EntityConfig {
    /// Create an entity declaration without inline attributes.
    pub fn new(
        name: impl Into<String>,
        model: impl Into<ModelType>,
        table: impl Into<String>,
        manager: impl Into<ManagerType>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            table: table.into(),
            manager: manager.into(),
            attributes: None,
        }
    }

    /// Add an inline attribute.
    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.get_or_insert_with(Vec::new).push(attribute);
        self
    }

    /// Add multiple inline attributes.
    pub fn with_attributes(
        mut self,
        attributes: impl IntoIterator<Item = AttributeDescriptor>,
    ) -> Self {
        self.attributes.get_or_insert_with(Vec::new).extend(attributes);
        self
    }
}
