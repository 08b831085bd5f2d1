//! Turns relation builders into engine relations.

use std::sync::Arc;

use super::builder::{RelationBuilder, RelationParam};
use super::engine::{Relation, RelationRequest};
use crate::error::{Error, Result};
use crate::morph::MorphGovernor;
use crate::registry::ModelType;

/// Resolves [`RelationBuilder`]s declared on a parent model.
///
/// Morph-one, morph-many and morph-to-many relations are validated against
/// the governor's allow-list first. Every other kind goes to the engine
/// with the builder's params untouched.
#[derive(Debug, Clone)]
pub struct RelationResolver {
    governor: Arc<MorphGovernor>,
}

impl RelationResolver {
    /// Create a resolver that validates through `governor`.
    pub fn new(governor: Arc<MorphGovernor>) -> Self {
        Self { governor }
    }

    /// Resolve a builder declared on `parent` into a relation.
    pub fn resolve(&self, parent: &ModelType, builder: RelationBuilder) -> Result<Relation> {
        let RelationBuilder { kind, name, params } = builder;

        if !kind.requires_allow_list() {
            return self.governor.engine().build_relation(RelationRequest {
                parent: parent.clone(),
                kind,
                name,
                params,
            });
        }

        match params.as_slice() {
            [RelationParam::Model(related), RelationParam::Ident(attribute)] => {
                self.governor.build_relation(parent, related, kind, &name, attribute)
            }
            _ => Err(Error::InvalidRelation(format!(
                "{kind} relation `{name}` needs exactly a related model and a morph attribute"
            ))),
        }
    }
}
