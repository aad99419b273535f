use tracing::debug;

use crate::backend::SqlBackend;
use crate::error::BulkQueryError;
use crate::error_classification::is_timeout_message;
use crate::sql::CompiledStatement;
use crate::types::QueryResult;

/// Run one compiled batch against the borrowed backend. A statement with no
/// parameters means an empty batch and returns an empty result with zero
/// round trips. Backend failures that look like deadline expiries are
/// reclassified as retryable timeouts.
pub(crate) async fn execute_compiled(
    backend: &dyn SqlBackend,
    statement: &CompiledStatement,
) -> Result<QueryResult, BulkQueryError> {
    if statement.params.is_empty() {
        return Ok(QueryResult::empty());
    }
    debug!(params = statement.params.len(), "executing batch statement");
    match backend.execute(&statement.sql, &statement.params).await {
        Ok(result) => Ok(result),
        Err(BulkQueryError::Execution(message)) if is_timeout_message(&message) => {
            Err(BulkQueryError::Timeout(message))
        }
        Err(error) => Err(error),
    }
}
