mod ident;
mod statement;
mod values_clause;

pub(crate) use statement::{compile_bulk_select, CompiledStatement};
pub use values_clause::FilterStrategy;
