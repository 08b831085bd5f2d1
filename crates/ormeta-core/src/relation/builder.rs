//! Declarative relation descriptions.

use super::kind::RelationKind;
use crate::registry::ModelType;

/// One positional relation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationParam {
    /// A model type (usually the related model).
    Model(ModelType),
    /// A plain identifier: morph attribute, key or table name.
    Ident(String),
}

impl RelationParam {
    /// Get the model type, if this is a model param.
    pub fn as_model(&self) -> Option<&ModelType> {
        match self {
            RelationParam::Model(model) => Some(model),
            RelationParam::Ident(_) => None,
        }
    }

    /// Get the identifier, if this is an identifier param.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            RelationParam::Ident(ident) => Some(ident),
            RelationParam::Model(_) => None,
        }
    }
}

impl From<ModelType> for RelationParam {
    fn from(model: ModelType) -> Self {
        RelationParam::Model(model)
    }
}

impl From<&str> for RelationParam {
    fn from(ident: &str) -> Self {
        RelationParam::Ident(ident.to_string())
    }
}

impl From<String> for RelationParam {
    fn from(ident: String) -> Self {
        RelationParam::Ident(ident)
    }
}

/// A relation to construct: kind, name and positional params.
///
/// Building one has no side effects; it is handed to a
/// [`RelationResolver`](super::RelationResolver) to obtain a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationBuilder {
    /// Relation kind.
    pub kind: RelationKind,
    /// Relation name (the accessor on the parent model).
    pub name: String,
    /// Positional params, interpreted per kind.
    pub params: Vec<RelationParam>,
}

impl RelationBuilder {
    /// Create a builder without params.
    pub fn new(kind: RelationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a param.
    pub fn with_param(mut self, param: impl Into<RelationParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Append multiple params.
    pub fn with_params(mut self, params: impl IntoIterator<Item = RelationParam>) -> Self {
        self.params.extend(params);
        self
    }

    /// Start a has-one relation.
    pub fn has_one(name: impl Into<String>) -> Self {
        Self::new(RelationKind::HasOne, name)
    }

    /// Start a has-many relation.
    pub fn has_many(name: impl Into<String>) -> Self {
        Self::new(RelationKind::HasMany, name)
    }

    /// Start a belongs-to relation.
    pub fn belongs_to(name: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsTo, name)
    }

    /// Start a belongs-to-many relation.
    pub fn belongs_to_many(name: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsToMany, name)
    }

    /// Start a morph-one relation.
    pub fn morph_one(name: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphOne, name)
    }

    /// Start a morph-many relation.
    pub fn morph_many(name: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphMany, name)
    }

    /// Start a morph-to relation.
    pub fn morph_to(name: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphTo, name)
    }

    /// Start a morph-to-many relation.
    pub fn morph_to_many(name: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphToMany, name)
    }

    /// Start a morphed-by-many relation.
    pub fn morphed_by_many(name: impl Into<String>) -> Self {
        Self::new(RelationKind::MorphedByMany, name)
    }

    /// First model param, if any.
    pub fn related(&self) -> Option<&ModelType> {
        self.params.iter().find_map(RelationParam::as_model)
    }
}
