use crate::backend::SqlDialect;
use crate::error::BulkQueryError;
use crate::sql::ident::quote_identifier;
use crate::sql::values_clause::{
    compile_or_predicates, compile_values_clause, FilterStrategy,
};
use crate::types::Value;

/// One executable statement with its flattened parameter list. Immutable
/// once built; statements of the same tuple width and batch size are
/// structurally identical.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledStatement {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
}

pub(crate) fn compile_bulk_select(
    table: &str,
    filter_columns: &[String],
    select_columns: &[String],
    tuples: &[Vec<Value>],
    dialect: SqlDialect,
    strategy: FilterStrategy,
    for_update: bool,
) -> Result<CompiledStatement, BulkQueryError> {
    if tuples.is_empty() {
        return Err(BulkQueryError::compile(
            "cannot compile a statement for an empty tuple set",
        ));
    }
    if for_update && dialect == SqlDialect::Sqlite {
        return Err(BulkQueryError::compile(
            "FOR UPDATE is not supported by the sqlite dialect",
        ));
    }

    let quoted_table = quote_identifier(table)?;
    let quoted_select = select_columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Result<Vec<_>, _>>()?;
    let quoted_filter = filter_columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Result<Vec<_>, _>>()?;

    let (predicate, params) = match strategy {
        FilterStrategy::ValuesList => {
            let (clause, params) = compile_values_clause(tuples, dialect);
            (
                format!("({}) IN (VALUES {clause})", quoted_filter.join(", ")),
                params,
            )
        }
        FilterStrategy::OrPredicates => compile_or_predicates(&quoted_filter, tuples, dialect),
    };

    let mut sql = format!(
        "SELECT {select} FROM {table} WHERE {predicate}",
        select = quoted_select.join(", "),
        table = quoted_table,
    );
    if for_update {
        sql.push_str(" FOR UPDATE");
    }

    Ok(CompiledStatement { sql, params })
}
