//! Qualified column rewriting.

use std::sync::Arc;

use super::clause::{ScopeClause, UnresolvedReference};
use crate::error::Result;
use crate::registry::EntityRegistry;

/// Rewrites `table.column` references in a scope into entity naming.
///
/// For a scope compiled against entity `E`:
/// - `<E's table>.field` becomes `field`
/// - `<other table>.field` becomes `<other entity>.field`
/// - `<entity>.field` is already in entity naming and stays as is
/// - anything else is left alone and reported
#[derive(Debug, Clone)]
pub struct ScopeRewriter {
    registry: Arc<EntityRegistry>,
}

impl ScopeRewriter {
    /// Create a rewriter over a loaded registry.
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self { registry }
    }

    /// Rewrite clauses for `entity`, returning the rewritten scope.
    pub fn rewrite(&self, entity: &str, mut clauses: Vec<ScopeClause>) -> Result<Vec<ScopeClause>> {
        self.rewrite_in_place(entity, &mut clauses)?;
        Ok(clauses)
    }

    /// Rewrite clauses for `entity` in place.
    ///
    /// Fails only if `entity` is unknown. Qualifiers that name neither a
    /// table nor an entity are left untouched and returned as diagnostics.
    pub fn rewrite_in_place(
        &self,
        entity: &str,
        clauses: &mut [ScopeClause],
    ) -> Result<Vec<UnresolvedReference>> {
        let own_table = self.registry.table_of(entity)?;
        let mut unresolved = Vec::new();

        for (index, clause) in clauses.iter_mut().enumerate() {
            let Some((qualifier, field)) = clause.qualifier() else {
                continue;
            };

            if qualifier == own_table {
                clause.column = field.to_string();
                continue;
            }

            match self.registry.find_by_table_name(qualifier) {
                Ok(other) => {
                    clause.column = format!("{}.{field}", other.name());
                }
                // Already in entity naming.
                Err(_) if self.registry.find_by_name(qualifier).is_ok() => {}
                Err(_) => {
                    tracing::warn!(
                        entity,
                        column = %clause.column,
                        qualifier,
                        "scope qualifier is not a known table, leaving column unchanged"
                    );
                    unresolved.push(UnresolvedReference {
                        index,
                        column: clause.column.clone(),
                        qualifier: qualifier.to_string(),
                    });
                }
            }
        }

        Ok(unresolved)
    }

    /// Rewrite a single column reference for `entity`.
    pub fn rewrite_column(&self, entity: &str, column: &str) -> Result<String> {
        let mut clauses = [ScopeClause::is_null(column)];
        self.rewrite_in_place(entity, &mut clauses)?;
        let [clause] = clauses;
        Ok(clause.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeOperator;
    use crate::testing::sample_registry;

    fn rewriter() -> ScopeRewriter {
        ScopeRewriter::new(sample_registry())
    }

    #[test]
    fn test_own_table_is_stripped() {
        let rewritten = rewriter()
            .rewrite("order", vec![ScopeClause::eq("orders.total", 10)])
            .unwrap();

        assert_eq!(rewritten, vec![ScopeClause::eq("total", 10)]);
    }

    #[test]
    fn test_other_table_becomes_entity() {
        let rewritten = rewriter()
            .rewrite("order", vec![ScopeClause::eq("customers.name", "Ada")])
            .unwrap();

        assert_eq!(rewritten[0].column, "customer.name");
        assert_eq!(rewritten[0].value, "Ada");
    }

    #[test]
    fn test_unknown_table_is_reported() {
        let rewriter = rewriter();
        let mut clauses = vec![
            ScopeClause::eq("ghost_table.x", 1),
            ScopeClause::new("orders.total", ScopeOperator::Gt, 5),
        ];

        let unresolved = rewriter.rewrite_in_place("order", &mut clauses).unwrap();

        assert_eq!(clauses[0].column, "ghost_table.x");
        assert_eq!(clauses[1].column, "total");
        assert_eq!(
            unresolved,
            vec![UnresolvedReference {
                index: 0,
                column: "ghost_table.x".to_string(),
                qualifier: "ghost_table".to_string(),
            }]
        );
    }

    #[test]
    fn test_entity_qualifier_is_resolved() {
        let rewriter = rewriter();
        let mut clauses = vec![ScopeClause::eq("customer.name", "Ada")];

        let unresolved = rewriter.rewrite_in_place("order", &mut clauses).unwrap();
        assert!(unresolved.is_empty());
        assert_eq!(clauses[0].column, "customer.name");

        let mut once = rewriter
            .rewrite("order", vec![ScopeClause::eq("customers.name", "Ada")])
            .unwrap();
        let unresolved = rewriter.rewrite_in_place("order", &mut once).unwrap();
        assert!(unresolved.is_empty());
        assert_eq!(once[0].column, "customer.name");
    }

    #[test]
    fn test_unqualified_and_nested_columns() {
        let rewriter = rewriter();

        assert_eq!(rewriter.rewrite_column("order", "total").unwrap(), "total");
        assert_eq!(
            rewriter.rewrite_column("order", "customers.address.city").unwrap(),
            "customer.address.city"
        );
    }

    #[test]
    fn test_unknown_entity_fails() {
        let err = rewriter()
            .rewrite("ghost", vec![ScopeClause::eq("orders.total", 1)])
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
