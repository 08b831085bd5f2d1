//! ORMETA Core - Entity registry, schema derivation, and relation governance.
//!
//! Packages declare entities through configuration. This crate indexes
//! those declarations, derives persistence schemas from attribute metadata,
//! governs which entities may take part in polymorphic relations, and
//! rewrites qualified scope columns into entity naming. Query execution is
//! left to a [`QueryEngine`] implementation.

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod morph;
pub mod registry;
pub mod relation;
pub mod schema;
pub mod scope;

#[cfg(test)]
mod testing;

pub use config::{EntityConfig, PackageConfig, RegistryConfig};
pub use context::EntityContext;
pub use error::{Error, LookupKind, Result};
pub use model::{EntityModel, RelationResolvable, SchemaDerivable};
pub use morph::{MorphAllowList, MorphCandidate, MorphGovernor};
pub use registry::{
    AttributeDescriptor, AttributeKind, DeclaredManager, EntityDescriptor, EntityManager,
    EntityRegistry, ManagerFactories, ManagerFactory, ManagerType, ModelType,
};
pub use relation::{
    Cardinality, DescriptorEngine, MorphMap, QueryEngine, Relation, RelationBuilder,
    RelationKind, RelationParam, RelationRequest, RelationResolver,
};
pub use schema::{CacheStats, CastRule, DerivedSchema, SchemaCache, SchemaDeriver};
pub use scope::{ScopeClause, ScopeOperator, ScopeRewriter, UnresolvedReference};
