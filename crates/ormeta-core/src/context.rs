//! Shared entity context.

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::morph::MorphGovernor;
use crate::registry::{EntityRegistry, ManagerFactories, ModelType};
use crate::relation::{QueryEngine, Relation, RelationBuilder, RelationResolver};
use crate::schema::{DerivedSchema, SchemaCache, SchemaDeriver};
use crate::scope::{ScopeClause, ScopeRewriter, UnresolvedReference};

/// Everything a model needs at runtime: the loaded registry, the query
/// engine, the morph governor and the schema cache.
///
/// Built once after the registry is loaded and shared behind an `Arc`.
#[derive(Debug)]
pub struct EntityContext {
    registry: Arc<EntityRegistry>,
    governor: Arc<MorphGovernor>,
    deriver: SchemaDeriver,
    schemas: SchemaCache,
    resolver: RelationResolver,
    rewriter: ScopeRewriter,
}

impl EntityContext {
    /// Build a context over a loaded registry and a query engine.
    pub fn new(registry: Arc<EntityRegistry>, engine: Arc<dyn QueryEngine>) -> Self {
        let governor = Arc::new(MorphGovernor::new(Arc::clone(&registry), engine));
        Self {
            deriver: SchemaDeriver::new(Arc::clone(&registry)),
            schemas: SchemaCache::new(),
            resolver: RelationResolver::new(Arc::clone(&governor)),
            rewriter: ScopeRewriter::new(Arc::clone(&registry)),
            registry,
            governor,
        }
    }

    /// Load a registry from configuration and build a context over it.
    pub fn from_config(
        config: &RegistryConfig,
        factories: &ManagerFactories,
        engine: Arc<dyn QueryEngine>,
    ) -> Result<Self> {
        let registry = EntityRegistry::from_config(config, factories)?;
        Ok(Self::new(Arc::new(registry), engine))
    }

    /// The loaded entity registry.
    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// The morph relation governor.
    pub fn governor(&self) -> &Arc<MorphGovernor> {
        &self.governor
    }

    /// The query engine.
    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        self.governor.engine()
    }

    /// The derived schema cache.
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Derived schema of an entity, cached until invalidated.
    pub fn schema(&self, entity: &str) -> Result<Arc<DerivedSchema>> {
        self.schemas.get_or_insert_with(entity, || self.deriver.derive(entity))
    }

    /// Drop an entity's cached schema so the next access re-derives it.
    pub fn invalidate_schema(&self, entity: &str) -> bool {
        self.schemas.invalidate(entity)
    }

    /// Model type behind a persisted morph alias.
    ///
    /// Aliases registered with the engine win; otherwise the alias is
    /// treated as an entity name.
    pub fn model_for_alias(&self, alias: &str) -> Option<ModelType> {
        self.engine()
            .resolve_alias(alias)
            .or_else(|| self.registry.model_of(alias).ok().cloned())
    }

    /// Resolve a relation declared on `parent`.
    pub fn relation(&self, parent: &ModelType, builder: RelationBuilder) -> Result<Relation> {
        self.resolver.resolve(parent, builder)
    }

    /// Rewrite a scope compiled against `entity`.
    pub fn rewrite(&self, entity: &str, clauses: Vec<ScopeClause>) -> Result<Vec<ScopeClause>> {
        self.rewriter.rewrite(entity, clauses)
    }

    /// Rewrite a scope in place, returning qualifiers left unresolved.
    pub fn rewrite_in_place(
        &self,
        entity: &str,
        clauses: &mut [ScopeClause],
    ) -> Result<Vec<UnresolvedReference>> {
        self.rewriter.rewrite_in_place(entity, clauses)
    }

    /// The scope rewriter.
    pub fn rewriter(&self) -> &ScopeRewriter {
        &self.rewriter
    }
}
