//! Core error types.

use std::fmt;

use thiserror::Error;

/// What kind of key a failed lookup was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Entity name.
    Entity,
    /// Backing model type.
    Model,
    /// Storage table name.
    Table,
    /// Declaring package.
    Package,
    /// Manager constructor.
    Manager,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Entity => write!(f, "entity"),
            LookupKind::Model => write!(f, "model"),
            LookupKind::Table => write!(f, "table"),
            LookupKind::Package => write!(f, "package"),
            LookupKind::Manager => write!(f, "manager"),
        }
    }
}

/// Metadata layer errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No descriptor matches the lookup key.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of key that was looked up.
        kind: LookupKind,
        /// The key itself.
        key: String,
    },

    /// Polymorphic relation requested for a candidate outside the allow-list.
    #[error(
        "relation {parent}::{relation}() is not supported: {candidate} is not allowed for {entity}.{attribute}"
    )]
    UnsupportedRelation {
        /// Model type the relation was requested on.
        parent: String,
        /// Relation name.
        relation: String,
        /// Entity declaring the morph attribute.
        entity: String,
        /// Morph attribute name.
        attribute: String,
        /// Candidate that was rejected.
        candidate: String,
    },

    /// Malformed registry configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Entity declares a manager with no constructor and no inline attributes.
    #[error("no constructor registered for manager {manager} of entity {entity}")]
    MissingManager {
        /// Entity name.
        entity: String,
        /// Manager type name.
        manager: String,
    },

    /// Relation builder params do not fit its kind.
    #[error("invalid relation: {0}")]
    InvalidRelation(String),

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(kind: LookupKind, key: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;
