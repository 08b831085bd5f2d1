//! Filter clauses.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeOperator {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Pattern match.
    Like,
    /// Negated pattern match.
    NotLike,
    /// Member of a list.
    In,
    /// Not a member of a list.
    NotIn,
    /// Value is null.
    IsNull,
    /// Value is not null.
    IsNotNull,
}

impl fmt::Display for ScopeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ScopeOperator::Eq => "=",
            ScopeOperator::Ne => "!=",
            ScopeOperator::Lt => "<",
            ScopeOperator::Le => "<=",
            ScopeOperator::Gt => ">",
            ScopeOperator::Ge => ">=",
            ScopeOperator::Like => "LIKE",
            ScopeOperator::NotLike => "NOT LIKE",
            ScopeOperator::In => "IN",
            ScopeOperator::NotIn => "NOT IN",
            ScopeOperator::IsNull => "IS NULL",
            ScopeOperator::IsNotNull => "IS NOT NULL",
        };
        f.write_str(op)
    }
}

/// One `{ column, operator, value }` filter clause.
///
/// `column` is either a bare field or `qualifier.field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeClause {
    /// Column, optionally qualified.
    pub column: String,
    /// Comparison operator.
    pub operator: ScopeOperator,
    /// Operand; `null` for unary operators.
    #[serde(default)]
    pub value: Value,
}

impl ScopeClause {
    /// Create a clause.
    pub fn new(
        column: impl Into<String>,
        operator: ScopeOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, ScopeOperator::Eq, value)
    }

    /// `column IS NULL`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, ScopeOperator::IsNull, Value::Null)
    }

    /// Split the column on its first `.` into qualifier and field.
    pub fn qualifier(&self) -> Option<(&str, &str)> {
        self.column.split_once('.')
    }
}

/// A qualifier the rewriter could not resolve to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// Position of the clause in the scope.
    pub index: usize,
    /// The column as written.
    pub column: String,
    /// The qualifier that matched no table.
    pub qualifier: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clause {}: `{}` qualifier `{}` is not a known table",
            self.index, self.column, self.qualifier
        )
    }
}
