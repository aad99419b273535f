use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};
use tokio::sync::OnceCell;

use bulkquery_engine::{BulkQueryError, QueryResult, SqlBackend, SqlDialect, Value};

/// In-memory SQLite backend for the integration tests. The pool is capped
/// at one connection so every statement sees the same database, and every
/// `execute` issued by the engine is counted (`seed` is not).
pub struct SqliteTestBackend {
    pool: OnceCell<SqlitePool>,
    parameter_limit: usize,
    values_join: bool,
    executed_statements: Arc<AtomicUsize>,
}

impl SqliteTestBackend {
    pub fn new() -> Self {
        Self {
            pool: OnceCell::const_new(),
            parameter_limit: SqlDialect::Sqlite.default_parameter_limit(),
            values_join: true,
            executed_statements: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_parameter_limit(mut self, limit: usize) -> Self {
        self.parameter_limit = limit;
        self
    }

    pub fn without_values_join(mut self) -> Self {
        self.values_join = false;
        self
    }

    pub fn statement_counter(&self) -> Arc<AtomicUsize> {
        self.executed_statements.clone()
    }

    pub async fn seed(&self, sql: &str, params: &[Value]) -> Result<(), BulkQueryError> {
        self.run(sql, params).await.map(|_| ())
    }

    async fn pool(&self) -> Result<&SqlitePool, BulkQueryError> {
        self.pool
            .get_or_try_init(|| async {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:")
                    .await
                    .map_err(|error| BulkQueryError::execution(error.to_string()))
            })
            .await
    }

    async fn run(&self, sql: &str, params: &[Value]) -> Result<QueryResult, BulkQueryError> {
        let pool = self.pool().await?;
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_param(query, param);
        }
        let rows = query
            .fetch_all(pool)
            .await
            .map_err(|error| BulkQueryError::execution(error.to_string()))?;

        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut out_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut out = Vec::with_capacity(row.columns().len());
            for index in 0..row.columns().len() {
                out.push(map_row_value(row, index)?);
            }
            out_rows.push(out);
        }
        Ok(QueryResult {
            columns,
            rows: out_rows,
        })
    }
}

#[async_trait(?Send)]
impl SqlBackend for SqliteTestBackend {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn parameter_limit(&self) -> usize {
        self.parameter_limit
    }

    fn supports_values_join(&self) -> bool {
        self.values_join
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult, BulkQueryError> {
        self.executed_statements.fetch_add(1, Ordering::SeqCst);
        self.run(sql, params).await
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_param<'q>(query: SqliteQuery<'q>, param: &'q Value) -> SqliteQuery<'q> {
    match param {
        Value::Null => query.bind(Option::<i64>::None),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.as_str()),
        Value::Boolean(v) => query.bind(*v),
        Value::Blob(v) => query.bind(v.as_slice()),
        Value::Json(v) => query.bind(v.to_string()),
    }
}

fn map_row_value(row: &SqliteRow, index: usize) -> Result<Value, BulkQueryError> {
    let raw = row
        .try_get_raw(index)
        .map_err(|error| BulkQueryError::execution(error.to_string()))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(Value::Integer)
            .map_err(|error| BulkQueryError::execution(error.to_string())),
        "REAL" | "NUMERIC" => row
            .try_get::<f64, _>(index)
            .map(Value::Real)
            .map_err(|error| BulkQueryError::execution(error.to_string())),
        "TEXT" => row
            .try_get::<String, _>(index)
            .map(Value::Text)
            .map_err(|error| BulkQueryError::execution(error.to_string())),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(Value::Blob)
            .map_err(|error| BulkQueryError::execution(error.to_string())),
        other => Err(BulkQueryError::execution(format!(
            "unsupported sqlite value type {other}"
        ))),
    }
}
