//! Filter conditions for group listings.
//!
//! The dispatch layer treats conditions as opaque input: it never
//! inspects or mutates them, only forwards them to listeners, resolvers
//! and the underlying directory. Translation into an actual query is the
//! directory implementation's concern.

use serde::{Deserialize, Serialize};

/// Comparison operator of a single filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionOperator {
    /// Exact match.
    Eq,
    /// Starts with.
    Sw,
    /// Ends with.
    Ew,
    /// Contains.
    Co,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
}

/// A single field/operator/value predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionCondition {
    pub field: String,
    pub operator: ExpressionOperator,
    pub value: String,
}

/// A filter tree of predicates joined by AND/OR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Condition {
    Expression(ExpressionCondition),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Leaf predicate shorthand.
    pub fn expression(
        field: impl Into<String>,
        operator: ExpressionOperator,
        value: impl Into<String>,
    ) -> Self {
        Condition::Expression(ExpressionCondition {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Self {
        Condition::Or(Box::new(self), Box::new(other))
    }
}
