//! Capability traits implemented by model types.
//!
//! A model names the entity it backs through [`EntityModel`]; the other
//! traits are opt-in and need no methods of their own:
//!
//! ```
//! use ormeta_core::{EntityModel, RelationResolvable, SchemaDerivable};
//!
//! struct Post;
//!
//! impl EntityModel for Post {
//!     const ENTITY: &'static str = "post";
//! }
//!
//! impl SchemaDerivable for Post {}
//! impl RelationResolvable for Post {}
//! ```

use std::sync::Arc;

use crate::context::EntityContext;
use crate::error::Result;
use crate::morph::MorphCandidate;
use crate::registry::ModelType;
use crate::relation::{Relation, RelationBuilder};
use crate::schema::DerivedSchema;
use crate::scope::ScopeClause;

/// A model backing a registered entity.
pub trait EntityModel {
    /// Name of the entity this model backs.
    const ENTITY: &'static str;

    /// Model type registered for the entity.
    fn model_type(ctx: &EntityContext) -> Result<ModelType> {
        ctx.registry().model_of(Self::ENTITY).cloned()
    }

    /// Storage table of the entity.
    fn table(ctx: &EntityContext) -> Result<String> {
        ctx.registry().table_of(Self::ENTITY).map(str::to_string)
    }

    /// Name stored in morph type columns for this model.
    fn morph_name() -> &'static str {
        Self::ENTITY
    }
}

/// Models whose persistence schema comes from attribute metadata.
pub trait SchemaDerivable: EntityModel {
    /// Cached derived schema of the entity.
    fn schema(ctx: &EntityContext) -> Result<Arc<DerivedSchema>> {
        ctx.schema(Self::ENTITY)
    }

    /// Fillable attribute names, sorted.
    fn fillable(ctx: &EntityContext) -> Result<Vec<String>> {
        Ok(Self::schema(ctx)?.fillable.iter().cloned().collect())
    }

    /// Hidden attribute names, sorted.
    fn hidden(ctx: &EntityContext) -> Result<Vec<String>> {
        Ok(Self::schema(ctx)?.hidden.iter().cloned().collect())
    }
}

/// Models that declare relations and scopes.
pub trait RelationResolvable: EntityModel {
    /// Resolve a relation with this model as parent.
    fn relation(ctx: &EntityContext, builder: RelationBuilder) -> Result<Relation> {
        let parent = Self::model_type(ctx)?;
        ctx.relation(&parent, builder)
    }

    /// Allow a candidate on one of this model's morph attributes.
    fn allow_morph(
        ctx: &EntityContext,
        attribute: &str,
        candidate: impl Into<MorphCandidate>,
    ) -> Result<bool> {
        ctx.governor().register(Self::ENTITY, attribute, candidate)
    }

    /// Rewrite a scope compiled against this model.
    fn scope(ctx: &EntityContext, clauses: Vec<ScopeClause>) -> Result<Vec<ScopeClause>> {
        ctx.rewrite(Self::ENTITY, clauses)
    }
}
