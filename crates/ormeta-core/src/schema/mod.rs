//! Schema derivation from attribute metadata.

mod cache;
mod deriver;

pub use cache::{CacheStats, SchemaCache};
pub use deriver::{
    CastRule, DerivedSchema, SchemaDeriver, DEFAULT_DATE_FORMAT, DEFAULT_DATE_TIME_FORMAT,
};
