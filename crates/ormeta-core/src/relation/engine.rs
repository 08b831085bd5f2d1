//! Query engine capability and a descriptor-building implementation.
//!
//! The metadata layer never executes queries. It hands relation requests
//! to a [`QueryEngine`] and keeps the engine's morph alias map in sync.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;

use super::builder::RelationParam;
use super::kind::{Cardinality, RelationKind};
use crate::error::{Error, Result};
use crate::registry::ModelType;

/// A relation the engine is asked to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRequest {
    /// Model the relation is declared on.
    pub parent: ModelType,
    /// Relation kind.
    pub kind: RelationKind,
    /// Relation name.
    pub name: String,
    /// Positional params.
    pub params: Vec<RelationParam>,
}

/// A constructed relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    /// Relation name.
    pub name: String,
    /// Relation kind.
    pub kind: RelationKind,
    /// Model the relation is declared on.
    pub parent: ModelType,
    /// Related model; `None` for morph-to, where it is read from the type column.
    pub related: Option<ModelType>,
    /// Morph attribute naming the type/id column pair.
    pub morph_attribute: Option<String>,
    /// Extra key, pivot or column names.
    pub keys: Vec<String>,
}

impl Relation {
    /// Cardinality seen from the parent.
    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    /// Column holding the morph alias, e.g. `commentable_type`.
    pub fn morph_type_column(&self) -> Option<String> {
        self.morph_attribute
            .as_ref()
            .map(|attribute| format!("{attribute}_type"))
    }

    /// Column holding the morph id, e.g. `commentable_id`.
    pub fn morph_id_column(&self) -> Option<String> {
        self.morph_attribute
            .as_ref()
            .map(|attribute| format!("{attribute}_id"))
    }
}

/// Query engine capability consumed by the metadata layer.
pub trait QueryEngine: Send + Sync {
    /// Map a morph alias to a model type. Registering the same pair again is a no-op.
    fn register_alias(&self, alias: &str, model: &ModelType);

    /// Model type registered for a morph alias.
    fn resolve_alias(&self, alias: &str) -> Option<ModelType>;

    /// Construct a relation.
    fn build_relation(&self, request: RelationRequest) -> Result<Relation>;
}

/// Alias to model type map used when persisting polymorphic references.
#[derive(Debug, Default)]
pub struct MorphMap {
    aliases: RwLock<HashMap<String, ModelType>>,
}

impl MorphMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias. Returns whether the map changed.
    pub fn register(&self, alias: &str, model: &ModelType) -> bool {
        let mut aliases = self.aliases.write();
        if let Some(existing) = aliases.get(alias) {
            if existing == model {
                return false;
            }
            tracing::warn!(
                alias,
                previous = %existing,
                model = %model,
                "morph alias remapped"
            );
        }
        aliases.insert(alias.to_string(), model.clone());
        true
    }

    /// Model type for an alias.
    pub fn resolve(&self, alias: &str) -> Option<ModelType> {
        self.aliases.read().get(alias).cloned()
    }

    /// First alias registered for a model type, in alias order.
    pub fn alias_for(&self, model: &ModelType) -> Option<String> {
        let aliases = self.aliases.read();
        let mut matches: Vec<&String> = aliases
            .iter()
            .filter(|(_, m)| *m == model)
            .map(|(alias, _)| alias)
            .collect();
        matches.sort_unstable();
        matches.first().map(|alias| (*alias).clone())
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.read().len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.read().is_empty()
    }
}

/// Engine that turns relation requests into [`Relation`] descriptors.
///
/// Params are read positionally: the related model first (except for
/// morph-to), then the morph attribute for polymorphic kinds, then any
/// number of key names.
#[derive(Debug, Default)]
pub struct DescriptorEngine {
    morph_map: MorphMap,
}

impl DescriptorEngine {
    /// Create an engine with an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine's alias map.
    pub fn morph_map(&self) -> &MorphMap {
        &self.morph_map
    }
}

impl QueryEngine for DescriptorEngine {
    fn register_alias(&self, alias: &str, model: &ModelType) {
        if self.morph_map.register(alias, model) {
            tracing::debug!(alias, model = %model, "morph alias registered");
        }
    }

    fn resolve_alias(&self, alias: &str) -> Option<ModelType> {
        self.morph_map.resolve(alias)
    }

    fn build_relation(&self, request: RelationRequest) -> Result<Relation> {
        let RelationRequest {
            parent,
            kind,
            name,
            params,
        } = request;
        let mut params = params.into_iter().peekable();

        let related = if kind == RelationKind::MorphTo {
            None
        } else {
            match params.next() {
                Some(RelationParam::Model(model)) => Some(model),
                _ => {
                    return Err(Error::InvalidRelation(format!(
                        "{kind} relation `{name}` needs the related model as first param"
                    )))
                }
            }
        };

        let morph_attribute = match kind {
            RelationKind::MorphTo => {
                match params.next_if(|param| matches!(param, RelationParam::Ident(_))) {
                    Some(RelationParam::Ident(attribute)) => Some(attribute),
                    _ => Some(name.clone()),
                }
            }
            _ if kind.is_polymorphic() => match params.next() {
                Some(RelationParam::Ident(attribute)) => Some(attribute),
                _ => {
                    return Err(Error::InvalidRelation(format!(
                        "{kind} relation `{name}` needs the morph attribute after the related model"
                    )))
                }
            },
            _ => None,
        };

        let keys = params
            .map(|param| match param {
                RelationParam::Ident(key) => Ok(key),
                RelationParam::Model(model) => Err(Error::InvalidRelation(format!(
                    "{kind} relation `{name}` got unexpected model param {model}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(relation = %name, kind = %kind, parent = %parent, "relation built");

        Ok(Relation {
            name,
            kind,
            parent,
            related,
            morph_attribute,
            keys,
        })
    }
}
