/// Failure taxonomy for a bulk select call.
///
/// `Validation` and `Compile` are reported before any statement reaches the
/// backend. `Execution` carries the backend's native message. `Decode` is
/// attributed to the offending column and row. `Timeout` is the only
/// retryable kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkQueryError {
    Validation(String),
    Compile(String),
    Execution(String),
    Decode {
        column: String,
        row: usize,
        message: String,
    },
    Timeout(String),
}

impl BulkQueryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn decode(column: &str, row: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.to_string(),
            row,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl std::fmt::Display for BulkQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Compile(message) => write!(f, "statement compilation failed: {message}"),
            Self::Execution(message) => write!(f, "statement execution failed: {message}"),
            Self::Decode {
                column,
                row,
                message,
            } => write!(f, "decoding column '{column}' of row {row} failed: {message}"),
            Self::Timeout(message) => write!(f, "statement timed out: {message}"),
        }
    }
}

impl std::error::Error for BulkQueryError {}
