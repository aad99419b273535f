use crate::error::BulkQueryError;

/// How many tuples fit one statement under the backend's bound-parameter
/// ceiling. More filter columns than the ceiling allows is a configuration
/// error, reported before anything executes.
pub(crate) fn batch_size(
    tuple_width: usize,
    parameter_limit: usize,
) -> Result<usize, BulkQueryError> {
    if tuple_width == 0 {
        return Err(BulkQueryError::validation(
            "filter tuple width must be at least 1",
        ));
    }
    if tuple_width > parameter_limit {
        return Err(BulkQueryError::validation(format!(
            "{tuple_width} filter columns cannot fit a statement limited to \
             {parameter_limit} bound parameters"
        )));
    }
    Ok(parameter_limit / tuple_width)
}
