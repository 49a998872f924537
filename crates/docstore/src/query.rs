//! Composable query specifications
//!
//! A [`Query`] is an immutable value describing which documents of a
//! collection to return and in what order: AND-composed field conditions,
//! a compound ordering, an optional limit, and an optional "start after"
//! cursor for pagination. Because it is plain data rather than an opaque
//! callback, query plans stay introspectable and testable without a live
//! backend.
//!
//! Conditions and orderings name top-level document fields. A missing field
//! evaluates to JSON null, which sorts before every other value.

use engagement_core::JsonMap;
use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator for a field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Field equals the value
    Eq,
    /// Field does not equal the value
    Ne,
    /// Field is strictly less than the value
    Lt,
    /// Field is less than or equal to the value
    Le,
    /// Field is strictly greater than the value
    Gt,
    /// Field is greater than or equal to the value
    Ge,
}

/// Sort direction for an ordering clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// One AND-composed field condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Document field the condition applies to
    pub field: String,
    /// Comparison operator
    pub op: FieldOp,
    /// Value compared against
    pub value: Value,
}

/// One ordering clause of a compound sort key
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Document field to order by
    pub field: String,
    /// Sort direction
    pub direction: Direction,
}

/// Immutable query specification over one collection
///
/// Build by chaining; every method consumes and returns the query:
///
/// ```
/// use engagement_docstore::{Direction, FieldOp, Query};
/// use serde_json::json;
///
/// let query = Query::new()
///     .filter("status", FieldOp::Eq, json!("live"))
///     .order_by("last_updated", Direction::Ascending)
///     .order_by("message_id", Direction::Ascending)
///     .limit(50);
/// assert_eq!(query.order_clauses().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    conditions: Vec<Condition>,
    order_by: Vec<OrderBy>,
    limit: Option<usize>,
    start_after: Option<Vec<Value>>,
}

impl Query {
    /// An unconstrained query: all documents, store order, no limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field condition (AND-composed with existing conditions)
    pub fn filter(mut self, field: &str, op: FieldOp, value: Value) -> Self {
        self.conditions.push(Condition {
            field: field.to_string(),
            op,
            value,
        });
        self
    }

    /// Append an ordering clause to the compound sort key
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Cap the number of returned documents
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after the document whose sort key is `cursor`
    ///
    /// The cursor is a full compound sort key as produced by
    /// [`Query::order_key`] for the last item of the previous page.
    /// Only meaningful when at least one ordering clause is set.
    pub fn start_after(mut self, cursor: Vec<Value>) -> Self {
        self.start_after = Some(cursor);
        self
    }

    /// The AND-composed conditions of this query
    pub fn condition_clauses(&self) -> &[Condition] {
        &self.conditions
    }

    /// The compound ordering of this query
    pub fn order_clauses(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// The limit, if any
    pub fn limit_clause(&self) -> Option<usize> {
        self.limit
    }

    /// The start-after cursor, if any
    pub fn start_after_clause(&self) -> Option<&[Value]> {
        self.start_after.as_deref()
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Whether a document satisfies every condition
    pub fn matches(&self, doc: &JsonMap) -> bool {
        self.conditions.iter().all(|c| {
            let field = doc.get(&c.field).unwrap_or(&Value::Null);
            let ord = cmp_values(field, &c.value);
            match c.op {
                FieldOp::Eq => ord == Ordering::Equal,
                FieldOp::Ne => ord != Ordering::Equal,
                FieldOp::Lt => ord == Ordering::Less,
                FieldOp::Le => ord != Ordering::Greater,
                FieldOp::Gt => ord == Ordering::Greater,
                FieldOp::Ge => ord != Ordering::Less,
            }
        })
    }

    /// Extract a document's compound sort key (missing fields become null)
    pub fn order_key(&self, doc: &JsonMap) -> Vec<Value> {
        self.order_by
            .iter()
            .map(|o| doc.get(&o.field).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Compare two sort keys under this query's ordering directions
    pub fn cmp_order_keys(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (i, clause) in self.order_by.iter().enumerate() {
            let av = a.get(i).unwrap_or(&Value::Null);
            let bv = b.get(i).unwrap_or(&Value::Null);
            let ord = match clause.direction {
                Direction::Ascending => cmp_values(av, bv),
                Direction::Descending => cmp_values(bv, av),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Total order over JSON values for filtering and sorting
///
/// Values of different kinds compare by kind rank
/// (null < bool < number < string < array < object), matching the backend
/// convention that cross-type comparisons are ordered, never errors.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let xf = x.as_f64().unwrap_or(f64::NEG_INFINITY);
            let yf = y.as_f64().unwrap_or(f64::NEG_INFINITY);
            xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xe, ye) in x.iter().zip(y.iter()) {
                let ord = cmp_values(xe, ye);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => Ordering::Equal,
        _ => rank(a).cmp(&rank(b)),
    }
}
