mod backend;
mod batch;
mod decode;
mod engine;
mod error;
mod error_classification;
mod executor;
mod schema;
mod sql;
mod types;

pub use backend::{SqlBackend, SqlDialect};
pub use engine::{BulkSelectOptions, Engine};
pub use error::BulkQueryError;
pub use error_classification::{is_missing_relation_error, is_parameter_limit_error};
pub use schema::{ColumnDef, ColumnType, TableSchema};
pub use sql::FilterStrategy;
pub use types::{QueryResult, Record, Value};
