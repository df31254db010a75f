//! Dynamic row conversion
//!
//! Reference queries are configured by the operator, so the column set is
//! only known at runtime. Rows are converted to records by decoding each
//! column according to its reported type, coercing to the natural scalar
//! JSON value (string, number, temporal text, null).

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

use flowsift_core::Record;

/// Convert one database row into a record keyed by column label.
///
/// NULLs become JSON null, temporal values their ISO text, NUMERIC its
/// canonical decimal string. Columns of types with no scalar mapping fall
/// back to a string decode and then to null.
pub fn row_to_record(row: &PgRow) -> Record {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        record.insert(column.name().to_string(), column_value(row, idx));
    }
    record
}

fn column_value(row: &PgRow, idx: usize) -> Value {
    let type_name = row.columns()[idx].type_info().name();
    match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "INT2" => decode(row, idx, |v: i16| Value::from(v)),
        "INT4" => decode(row, idx, |v: i32| Value::from(v)),
        "INT8" => decode(row, idx, |v: i64| Value::from(v)),
        "FLOAT4" => decode(row, idx, |v: f32| Value::from(f64::from(v))),
        "FLOAT8" => decode(row, idx, |v: f64| Value::from(v)),
        "NUMERIC" => decode(row, idx, |v: rust_decimal::Decimal| {
            Value::String(v.to_string())
        }),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
            decode(row, idx, Value::String)
        }
        "DATE" => decode(row, idx, |v: chrono::NaiveDate| Value::String(v.to_string())),
        "TIME" => decode(row, idx, |v: chrono::NaiveTime| Value::String(v.to_string())),
        "TIMESTAMP" => decode(row, idx, |v: chrono::NaiveDateTime| {
            Value::String(v.to_string())
        }),
        "TIMESTAMPTZ" => decode(row, idx, |v: chrono::DateTime<chrono::Utc>| {
            Value::String(v.to_rfc3339())
        }),
        "UUID" => decode(row, idx, |v: uuid::Uuid| Value::String(v.to_string())),
        "JSON" | "JSONB" => decode(row, idx, |v: Value| v),
        other => {
            tracing::debug!(column_type = other, "Falling back to string decode");
            decode(row, idx, Value::String)
        }
    }
}

fn decode<'r, T, F>(row: &'r PgRow, idx: usize, to_value: F) -> Value
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    F: FnOnce(T) -> Value,
{
    row.try_get::<Option<T>, _>(idx)
        .ok()
        .flatten()
        .map(to_value)
        .unwrap_or(Value::Null)
}
