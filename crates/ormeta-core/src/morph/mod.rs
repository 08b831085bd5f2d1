//! Polymorphic relation governance.
//!
//! A morph attribute (say `commentable` on `comment`) can point at records
//! of several entities. Only entities explicitly allowed on that attribute
//! may declare relations through it.

mod allow_list;
mod governor;

pub use allow_list::{MorphAllowList, MorphCandidate};
pub use governor::MorphGovernor;
