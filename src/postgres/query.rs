use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio_postgres::Statement;
use tokio_postgres::types::Type;

use crate::error::LightbnbDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// `numeric` has no lossless Rust counterpart here; queries cast aggregates
/// to `float8` before they reach this point.
///
/// # Errors
/// Returns `LightbnbDbError` if the column cannot be retrieved.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, LightbnbDbError> {
    let type_info = row.columns()[idx].type_();

    let value = match *type_info {
        Type::INT2 => {
            let val: Option<i16> = row.try_get(idx)?;
            val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))
        }
        Type::INT4 => {
            let val: Option<i32> = row.try_get(idx)?;
            val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))
        }
        Type::INT8 => {
            let val: Option<i64> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Int)
        }
        Type::FLOAT4 => {
            let val: Option<f32> = row.try_get(idx)?;
            val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v)))
        }
        Type::FLOAT8 => {
            let val: Option<f64> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Float)
        }
        Type::BOOL => {
            let val: Option<bool> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Bool)
        }
        Type::DATE => {
            let val: Option<NaiveDate> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Date)
        }
        Type::TIMESTAMP => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Timestamp)
        }
        Type::TIMESTAMPTZ => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            val.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc()))
        }
        _ => {
            // text, varchar, bpchar, and anything else that decodes as a string
            let val: Option<String> = row.try_get(idx)?;
            val.map_or(RowValues::Null, RowValues::Text)
        }
    };
    Ok(value)
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, LightbnbDbError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values)?;
    }

    Ok(result_set)
}
