//! Relation kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one related record.
    One,
    /// Any number of related records.
    Many,
}

/// Kind of relation between two models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Parent owns one related record through a foreign key on the related side.
    HasOne,
    /// Parent owns many related records through a foreign key on the related side.
    HasMany,
    /// Parent holds the foreign key of one related record.
    BelongsTo,
    /// Many-to-many through a pivot table.
    BelongsToMany,
    /// Parent owns one related record through a morph type/id pair on the related side.
    MorphOne,
    /// Parent owns many related records through a morph type/id pair on the related side.
    MorphMany,
    /// Parent holds a morph type/id pair pointing at any allowed model.
    MorphTo,
    /// Many-to-many through a pivot carrying a morph type/id pair for the parent.
    MorphToMany,
    /// Inverse of [`RelationKind::MorphToMany`], declared on the related side.
    MorphedByMany,
}

impl RelationKind {
    /// Check if the relation is polymorphic.
    pub fn is_polymorphic(&self) -> bool {
        matches!(
            self,
            RelationKind::MorphOne
                | RelationKind::MorphMany
                | RelationKind::MorphTo
                | RelationKind::MorphToMany
                | RelationKind::MorphedByMany
        )
    }

    /// Check if the parent must be allow-listed on the related model's morph attribute.
    ///
    /// `MorphTo` and `MorphedByMany` are declared by the model that owns the
    /// morph attribute, so there is no foreign parent to check.
    pub fn requires_allow_list(&self) -> bool {
        matches!(
            self,
            RelationKind::MorphOne | RelationKind::MorphMany | RelationKind::MorphToMany
        )
    }

    /// Cardinality seen from the parent.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationKind::HasOne
            | RelationKind::BelongsTo
            | RelationKind::MorphOne
            | RelationKind::MorphTo => Cardinality::One,
            RelationKind::HasMany
            | RelationKind::BelongsToMany
            | RelationKind::MorphMany
            | RelationKind::MorphToMany
            | RelationKind::MorphedByMany => Cardinality::Many,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::BelongsToMany => "belongs_to_many",
            RelationKind::MorphOne => "morph_one",
            RelationKind::MorphMany => "morph_many",
            RelationKind::MorphTo => "morph_to",
            RelationKind::MorphToMany => "morph_to_many",
            RelationKind::MorphedByMany => "morphed_by_many",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polymorphic_kinds() {
        assert!(RelationKind::MorphMany.is_polymorphic());
        assert!(RelationKind::MorphTo.is_polymorphic());
        assert!(!RelationKind::HasMany.is_polymorphic());
        assert!(!RelationKind::BelongsToMany.is_polymorphic());
    }

    #[test]
    fn test_allow_list_kinds() {
        assert!(RelationKind::MorphOne.requires_allow_list());
        assert!(RelationKind::MorphMany.requires_allow_list());
        assert!(RelationKind::MorphToMany.requires_allow_list());
        assert!(!RelationKind::MorphTo.requires_allow_list());
        assert!(!RelationKind::MorphedByMany.requires_allow_list());
        assert!(!RelationKind::HasOne.requires_allow_list());
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(RelationKind::MorphOne.cardinality(), Cardinality::One);
        assert_eq!(RelationKind::MorphToMany.cardinality(), Cardinality::Many);
        assert_eq!(RelationKind::MorphToMany.to_string(), "morph_to_many");
    }
}
