use crate::backend::SqlDialect;
use crate::types::Value;

/// How the tuple-membership predicate is expressed. Picked once per engine
/// from the backend's capabilities, never per call. Both forms bind every
/// value positionally, flatten parameters row-major and agree on NULL
/// semantics (a tuple with a NULL position matches nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    /// `(cols) IN (VALUES (?1,?2),(?3,?4))`
    ValuesList,
    /// `(c1 = ?1 AND c2 = ?2) OR (c1 = ?3 AND c2 = ?4)`
    OrPredicates,
}

/// Emit one parenthesized placeholder group per tuple, `(?1,?2),(?3,?4)`,
/// with the flattened parameter list in row-major order. Empty input
/// compiles to an empty clause and no parameters; callers must treat that
/// as "do not execute".
pub(crate) fn compile_values_clause(
    tuples: &[Vec<Value>],
    dialect: SqlDialect,
) -> (String, Vec<Value>) {
    let width = tuples.first().map(Vec::len).unwrap_or(0);
    let mut params = Vec::with_capacity(tuples.len() * width);
    let mut groups = Vec::with_capacity(tuples.len());
    let mut ordinal = 1usize;
    for tuple in tuples {
        let mut slots = Vec::with_capacity(tuple.len());
        for value in tuple {
            slots.push(dialect.placeholder(ordinal));
            ordinal += 1;
            params.push(value.clone());
        }
        groups.push(format!("({})", slots.join(",")));
    }
    (groups.join(","), params)
}

/// The fallback form: one equality conjunction per tuple, joined by OR.
/// Column names must already be quoted.
pub(crate) fn compile_or_predicates(
    quoted_filter_columns: &[String],
    tuples: &[Vec<Value>],
    dialect: SqlDialect,
) -> (String, Vec<Value>) {
    let width = quoted_filter_columns.len();
    let mut params = Vec::with_capacity(tuples.len() * width);
    let mut predicates = Vec::with_capacity(tuples.len());
    let mut ordinal = 1usize;
    for tuple in tuples {
        let mut conditions = Vec::with_capacity(width);
        for (column, value) in quoted_filter_columns.iter().zip(tuple) {
            conditions.push(format!("{column} = {}", dialect.placeholder(ordinal)));
            ordinal += 1;
            params.push(value.clone());
        }
        predicates.push(format!("({})", conditions.join(" AND ")));
    }
    (predicates.join(" OR "), params)
}
