use async_trait::async_trait;

use crate::{BulkQueryError, QueryResult, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    Postgres,
}

impl SqlDialect {
    /// The maximum number of bound parameters one statement may carry:
    /// SQLITE_MAX_VARIABLE_NUMBER for SQLite, the Int16 bind count of the
    /// Postgres extended protocol.
    pub const fn default_parameter_limit(self) -> usize {
        match self {
            SqlDialect::Sqlite => 32_766,
            SqlDialect::Postgres => 65_535,
        }
    }

    pub(crate) fn placeholder(self, index_1_based: usize) -> String {
        match self {
            SqlDialect::Sqlite => format!("?{index_1_based}"),
            SqlDialect::Postgres => format!("${index_1_based}"),
        }
    }
}

/// An acquired connection (or pool handing out one connection at a time)
/// that can run a single parameterized statement.
///
/// The engine issues the batches of one logical call sequentially against
/// the same backend, so all batches observe one connection's snapshot when
/// the implementation pins a connection. Concurrent use of one backend from
/// several calls is the caller's responsibility.
#[async_trait(?Send)]
pub trait SqlBackend: Send + Sync {
    fn dialect(&self) -> SqlDialect;

    fn parameter_limit(&self) -> usize {
        self.dialect().default_parameter_limit()
    }

    /// Whether `(cols) IN (VALUES ...)` joins are usable on this backend.
    /// Probed once at engine construction to pick the filter strategy.
    fn supports_values_join(&self) -> bool {
        true
    }

    /// Execute one statement with positional binds. `params` only ever
    /// contains `Null`, `Integer`, `Real`, `Text`, `Boolean` and `Blob`
    /// values; the engine serializes `Json` before execution.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult, BulkQueryError>;
}
