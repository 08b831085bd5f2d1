//! Filter scopes and cross-entity column rewriting.

mod clause;
mod rewriter;

pub use clause::{ScopeClause, ScopeOperator, UnresolvedReference};
pub use rewriter::ScopeRewriter;
