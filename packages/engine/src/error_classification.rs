use crate::BulkQueryError;

/// True when an execution error reports an undefined table or column.
pub fn is_missing_relation_error(error: &BulkQueryError) -> bool {
    match error {
        BulkQueryError::Execution(message) => is_missing_relation_message(message),
        _ => false,
    }
}

/// True when an execution error reports that the statement carried more
/// bound parameters than the backend permits.
pub fn is_parameter_limit_error(error: &BulkQueryError) -> bool {
    match error {
        BulkQueryError::Execution(message) => is_parameter_limit_message(message),
        _ => false,
    }
}

pub(crate) fn is_missing_relation_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("no such table")
        || lower.contains("no such column")
        || lower.contains("undefined column")
        || lower.contains("relation")
            && (lower.contains("does not exist")
                || lower.contains("undefined table")
                || lower.contains("unknown"))
}

pub(crate) fn is_parameter_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("too many sql variables")
        || lower.contains("too many variables")
        || lower.contains("number of parameters must be between")
}

pub(crate) fn is_timeout_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("statement cancelled")
        || lower.contains("canceling statement")
}
