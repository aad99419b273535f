use crate::error::BulkQueryError;
use crate::schema::{ColumnDef, ColumnType};
use crate::types::{QueryResult, Record, Value};

/// Map raw positional rows to named records, applying each select column's
/// declared decode. `row_offset` keeps row numbers in decode errors aligned
/// with the concatenated result when decoding one batch of several.
pub(crate) fn decode_rows(
    select_columns: &[ColumnDef],
    result: &QueryResult,
    row_offset: usize,
) -> Result<Vec<Record>, BulkQueryError> {
    let mut records = Vec::with_capacity(result.rows.len());
    for (index, row) in result.rows.iter().enumerate() {
        let row_number = row_offset + index;
        if row.len() != select_columns.len() {
            return Err(BulkQueryError::execution(format!(
                "backend returned {} columns where {} were selected",
                row.len(),
                select_columns.len()
            )));
        }
        let mut record = Record::default();
        for (column, value) in select_columns.iter().zip(row) {
            record.insert(column.name.clone(), decode_value(column, row_number, value)?);
        }
        records.push(record);
    }
    Ok(records)
}

fn decode_value(
    column: &ColumnDef,
    row: usize,
    value: &Value,
) -> Result<Value, BulkQueryError> {
    if matches!(value, Value::Null) {
        return Ok(Value::Null);
    }
    match column.column_type {
        ColumnType::Integer => match value {
            Value::Integer(_) => Ok(value.clone()),
            other => Err(mismatch(column, row, other)),
        },
        ColumnType::Real => match value {
            Value::Real(_) => Ok(value.clone()),
            Value::Integer(v) => Ok(Value::Real(*v as f64)),
            other => Err(mismatch(column, row, other)),
        },
        ColumnType::Text => match value {
            Value::Text(_) => Ok(value.clone()),
            other => Err(mismatch(column, row, other)),
        },
        ColumnType::Boolean => match value {
            Value::Boolean(_) => Ok(value.clone()),
            Value::Integer(0) => Ok(Value::Boolean(false)),
            Value::Integer(1) => Ok(Value::Boolean(true)),
            Value::Integer(other) => Err(BulkQueryError::decode(
                &column.name,
                row,
                format!("integer {other} is not a boolean"),
            )),
            other => Err(mismatch(column, row, other)),
        },
        ColumnType::Blob => match value {
            Value::Blob(_) => Ok(value.clone()),
            other => Err(mismatch(column, row, other)),
        },
        ColumnType::Json => match value {
            Value::Json(_) => Ok(value.clone()),
            Value::Text(text) => serde_json::from_str(text)
                .map(Value::Json)
                .map_err(|error| BulkQueryError::decode(&column.name, row, error.to_string())),
            Value::Blob(bytes) => serde_json::from_slice(bytes)
                .map(Value::Json)
                .map_err(|error| BulkQueryError::decode(&column.name, row, error.to_string())),
            other => Err(mismatch(column, row, other)),
        },
    }
}

fn mismatch(column: &ColumnDef, row: usize, value: &Value) -> BulkQueryError {
    BulkQueryError::decode(
        &column.name,
        row,
        format!(
            "expected {} but the backend returned {}",
            column.column_type.as_str(),
            value.kind()
        ),
    )
}
