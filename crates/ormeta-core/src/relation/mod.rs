//! Relation descriptions, the query engine seam, and resolution.

mod builder;
mod engine;
mod kind;
mod resolver;

pub use builder::{RelationBuilder, RelationParam};
pub use engine::{DescriptorEngine, MorphMap, QueryEngine, Relation, RelationRequest};
pub use kind::{Cardinality, RelationKind};
pub use resolver::RelationResolver;
