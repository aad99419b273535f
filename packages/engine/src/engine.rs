use tracing::debug;

use crate::backend::{SqlBackend, SqlDialect};
use crate::batch::batch_size;
use crate::decode::decode_rows;
use crate::error::BulkQueryError;
use crate::executor::execute_compiled;
use crate::schema::{ColumnDef, ColumnType, TableSchema};
use crate::sql::{compile_bulk_select, FilterStrategy};
use crate::types::{Record, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSelectOptions {
    /// Lock the matched rows (`FOR UPDATE`). Postgres only.
    pub for_update: bool,
}

/// Batched tuple-set lookups against one borrowed backend.
///
/// Batches of a call run sequentially against the backend the engine was
/// constructed with, so they share that connection's transactional view.
/// The filter strategy and parameter ceiling are resolved once here and
/// reused for every call.
pub struct Engine {
    backend: Box<dyn SqlBackend + Send + Sync>,
    strategy: FilterStrategy,
    parameter_limit: usize,
}

impl Engine {
    pub fn new(backend: Box<dyn SqlBackend + Send + Sync>) -> Self {
        let strategy = if backend.supports_values_join() {
            FilterStrategy::ValuesList
        } else {
            FilterStrategy::OrPredicates
        };
        let parameter_limit = backend.parameter_limit();
        Self {
            backend,
            strategy,
            parameter_limit,
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.backend.dialect()
    }

    pub fn filter_strategy(&self) -> FilterStrategy {
        self.strategy
    }

    /// Return the rows whose filter-column tuple appears in `filter_tuples`,
    /// as records keyed by `select_columns`.
    ///
    /// The result is unordered relative to the input tuples. A tuple with a
    /// NULL position matches nothing (NULL is never equal to NULL under the
    /// membership test). When the filter columns are not unique, every
    /// matching row is returned; nothing is deduplicated. On the first
    /// failing batch the whole call fails and prior batches' rows are
    /// discarded.
    pub async fn bulk_select(
        &self,
        table: &TableSchema,
        filter_columns: &[&str],
        filter_tuples: &[Vec<Value>],
        select_columns: &[&str],
    ) -> Result<Vec<Record>, BulkQueryError> {
        self.bulk_select_with_options(
            table,
            filter_columns,
            filter_tuples,
            select_columns,
            BulkSelectOptions::default(),
        )
        .await
    }

    pub async fn bulk_select_with_options(
        &self,
        table: &TableSchema,
        filter_columns: &[&str],
        filter_tuples: &[Vec<Value>],
        select_columns: &[&str],
        options: BulkSelectOptions,
    ) -> Result<Vec<Record>, BulkQueryError> {
        let filter_defs = resolve_columns(table, filter_columns, "filter")?;
        let select_defs = resolve_columns(table, select_columns, "select")?;

        for (index, tuple) in filter_tuples.iter().enumerate() {
            if tuple.len() != filter_defs.len() {
                return Err(BulkQueryError::validation(format!(
                    "filter tuple {index} has {} values but {} filter columns were given",
                    tuple.len(),
                    filter_defs.len(),
                )));
            }
        }

        if filter_tuples.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = filter_tuples
            .iter()
            .enumerate()
            .map(|(index, tuple)| encode_tuple(&filter_defs, index, tuple))
            .collect::<Result<Vec<_>, _>>()?;

        let size = batch_size(filter_defs.len(), self.parameter_limit)?;
        let filter_names = column_names(&filter_defs);
        let select_names = column_names(&select_defs);

        debug!(
            table = table.table(),
            tuples = encoded.len(),
            batch_size = size,
            "running bulk select"
        );

        let mut records = Vec::new();
        for chunk in encoded.chunks(size) {
            let statement = compile_bulk_select(
                table.table(),
                &filter_names,
                &select_names,
                chunk,
                self.backend.dialect(),
                self.strategy,
                options.for_update,
            )?;
            let result = execute_compiled(self.backend.as_ref(), &statement).await?;
            let decoded = decode_rows(&select_defs, &result, records.len())?;
            records.extend(decoded);
        }
        Ok(records)
    }
}

fn column_names(columns: &[ColumnDef]) -> Vec<String> {
    columns.iter().map(|column| column.name.clone()).collect()
}

fn resolve_columns(
    table: &TableSchema,
    names: &[&str],
    role: &str,
) -> Result<Vec<ColumnDef>, BulkQueryError> {
    if names.is_empty() {
        return Err(BulkQueryError::validation(format!(
            "{role} column list must not be empty"
        )));
    }
    names
        .iter()
        .map(|name| {
            table.column_def(name).cloned().ok_or_else(|| {
                BulkQueryError::validation(format!(
                    "{role} column '{name}' does not exist on table '{}'",
                    table.table()
                ))
            })
        })
        .collect()
}

fn encode_tuple(
    filter_defs: &[ColumnDef],
    tuple_index: usize,
    tuple: &[Value],
) -> Result<Vec<Value>, BulkQueryError> {
    filter_defs
        .iter()
        .zip(tuple)
        .map(|(column, value)| encode_filter_value(column, tuple_index, value))
        .collect()
}

/// Check a filter value against its column's declared type and serialize it
/// to the representation the statement binds: JSON values become their
/// canonical text form, everything else passes through as-is.
fn encode_filter_value(
    column: &ColumnDef,
    tuple_index: usize,
    value: &Value,
) -> Result<Value, BulkQueryError> {
    if matches!(value, Value::Null) {
        return Ok(Value::Null);
    }
    match (column.column_type, value) {
        (ColumnType::Integer, Value::Integer(_))
        | (ColumnType::Real, Value::Real(_))
        | (ColumnType::Text, Value::Text(_))
        | (ColumnType::Boolean, Value::Boolean(_))
        | (ColumnType::Blob, Value::Blob(_))
        | (ColumnType::Json, Value::Text(_)) => Ok(value.clone()),
        (ColumnType::Real, Value::Integer(v)) => Ok(Value::Real(*v as f64)),
        (ColumnType::Json, Value::Json(json)) => serde_json::to_string(json)
            .map(Value::Text)
            .map_err(|error| {
                BulkQueryError::validation(format!(
                    "filter tuple {tuple_index}: column '{}' holds JSON that cannot be \
                     serialized: {error}",
                    column.name
                ))
            }),
        (expected, value) => Err(BulkQueryError::validation(format!(
            "filter tuple {tuple_index}: column '{}' is declared {} but the value is {}",
            column.name,
            expected.as_str(),
            value.kind()
        ))),
    }
}
