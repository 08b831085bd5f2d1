//! Entity registry.
//!
//! Entities are declared by packages through configuration; the registry
//! indexes them by name, model type and table.

mod attribute;
mod entity;
mod manager;
mod registry;

pub use attribute::{AttributeDescriptor, AttributeKind};
pub use entity::{EntityDescriptor, ManagerType, ModelType};
pub use manager::{DeclaredManager, EntityManager, ManagerFactories, ManagerFactory};
pub use registry::EntityRegistry;
