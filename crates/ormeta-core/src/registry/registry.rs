//! Indexed collection of entity descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use super::entity::{EntityDescriptor, ManagerType, ModelType};
use super::manager::{DeclaredManager, EntityManager, ManagerFactories};
use crate::config::{EntityConfig, RegistryConfig};
use crate::error::{Error, LookupKind, Result};

/// Registry of every entity declared by every package.
///
/// Built once by [`EntityRegistry::load`] and read-only afterwards, so a
/// loaded registry can be shared across threads behind an `Arc`.
///
/// Entity names are unique. When two declarations use the same name, the
/// one loaded last wins: packages load in configuration order, and entities
/// in document order within a package. Table names must also be unique
/// across the final set of entities.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Descriptors in first-declaration order.
    entities: Vec<EntityDescriptor>,
    /// Entity name to index in `entities`.
    by_name: HashMap<String, usize>,
    /// Table name to index in `entities`.
    by_table: HashMap<String, usize>,
    /// Package ids in configuration order.
    packages: Vec<String>,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry loaded from configuration.
    pub fn from_config(config: &RegistryConfig, factories: &ManagerFactories) -> Result<Self> {
        let mut registry = Self::new();
        registry.load(config, factories)?;
        Ok(registry)
    }

    /// Build the index from configuration, replacing any previous contents.
    ///
    /// On error the registry is left unchanged.
    pub fn load(&mut self, config: &RegistryConfig, factories: &ManagerFactories) -> Result<()> {
        let mut built = Self::new();

        for package in config.packages() {
            if !built.packages.contains(&package.id) {
                built.packages.push(package.id.clone());
            }

            for entity in &package.entities {
                let manager = instantiate_manager(entity, factories)?;
                let descriptor = EntityDescriptor::new(
                    entity.name.as_str(),
                    package.id.as_str(),
                    entity.model.clone(),
                    entity.table.as_str(),
                    entity.manager.clone(),
                    manager,
                );
                built.insert(descriptor);
            }
        }

        built.index_tables()?;

        tracing::info!(
            packages = built.packages.len(),
            entities = built.entities.len(),
            "entity registry loaded"
        );

        *self = built;
        Ok(())
    }

    fn insert(&mut self, descriptor: EntityDescriptor) {
        let existing = self.by_name.get(descriptor.name()).copied();
        match existing {
            Some(index) => {
                tracing::warn!(
                    entity = descriptor.name(),
                    previous_package = self.entities[index].package(),
                    package = descriptor.package(),
                    "entity redeclared, last declaration wins"
                );
                self.entities[index] = descriptor;
            }
            None => {
                self.by_name
                    .insert(descriptor.name().to_string(), self.entities.len());
                self.entities.push(descriptor);
            }
        }
    }

    fn index_tables(&mut self) -> Result<()> {
        for (index, entity) in self.entities.iter().enumerate() {
            if let Some(&existing) = self.by_table.get(entity.table()) {
                return Err(Error::InvalidConfig(format!(
                    "table `{}` is declared by both `{}` and `{}`",
                    entity.table(),
                    self.entities[existing].name(),
                    entity.name()
                )));
            }
            self.by_table.insert(entity.table().to_string(), index);
        }
        Ok(())
    }

    /// Find an entity by name.
    pub fn find_by_name(&self, name: &str) -> Result<&EntityDescriptor> {
        self.by_name
            .get(name)
            .map(|&index| &self.entities[index])
            .ok_or_else(|| Error::not_found(LookupKind::Entity, name))
    }

    /// Find the first entity backed by the given model type.
    pub fn find_by_model_type(&self, model: &ModelType) -> Result<&EntityDescriptor> {
        self.entities
            .iter()
            .find(|e| e.model() == model)
            .ok_or_else(|| Error::not_found(LookupKind::Model, model.as_str()))
    }

    /// Find an entity by table name.
    pub fn find_by_table_name(&self, table: &str) -> Result<&EntityDescriptor> {
        self.by_table
            .get(table)
            .map(|&index| &self.entities[index])
            .ok_or_else(|| Error::not_found(LookupKind::Table, table))
    }

    /// Package that declared the entity.
    pub fn package_of(&self, name: &str) -> Result<&str> {
        self.find_by_name(name).map(EntityDescriptor::package)
    }

    /// Package ids in configuration order.
    pub fn list_packages(&self) -> &[String] {
        &self.packages
    }

    /// Names of the entities a package declares (after collisions are resolved).
    pub fn entities_in_package(&self, package: &str) -> Result<Vec<&str>> {
        if !self.packages.iter().any(|p| p == package) {
            return Err(Error::not_found(LookupKind::Package, package));
        }
        Ok(self
            .entities
            .iter()
            .filter(|e| e.package() == package)
            .map(EntityDescriptor::name)
            .collect())
    }

    /// Model type backing the entity.
    pub fn model_of(&self, name: &str) -> Result<&ModelType> {
        self.find_by_name(name).map(EntityDescriptor::model)
    }

    /// Table storing the entity.
    pub fn table_of(&self, name: &str) -> Result<&str> {
        self.find_by_name(name).map(EntityDescriptor::table)
    }

    /// Manager type of the entity.
    pub fn manager_type_of(&self, name: &str) -> Result<&ManagerType> {
        self.find_by_name(name).map(EntityDescriptor::manager_type)
    }

    /// Model type stored in the given table.
    pub fn model_for_table(&self, table: &str) -> Result<&ModelType> {
        self.find_by_table_name(table).map(EntityDescriptor::model)
    }

    /// Manager instance for the entity backed by the model type.
    pub fn manager_for_model(&self, model: &ModelType) -> Result<Arc<dyn EntityManager>> {
        self.find_by_model_type(model).map(|e| Arc::clone(e.manager()))
    }

    /// Morph name of a model type: the name of the entity it backs.
    pub fn morph_name_of(&self, model: &ModelType) -> Result<&str> {
        self.find_by_model_type(model).map(EntityDescriptor::morph_name)
    }

    /// Entity names in first-declaration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(EntityDescriptor::name).collect()
    }

    /// Iterate over all descriptors.
    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entities are loaded.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn instantiate_manager(
    entity: &EntityConfig,
    factories: &ManagerFactories,
) -> Result<Arc<dyn EntityManager>> {
    if let Some(manager) = factories.create(&entity.manager) {
        return Ok(manager);
    }

    match &entity.attributes {
        Some(attributes) => Ok(Arc::new(DeclaredManager::new(attributes.clone()))),
        None => Err(Error::MissingManager {
            entity: entity.name.clone(),
            manager: entity.manager.to_string(),
        }),
    }
}
