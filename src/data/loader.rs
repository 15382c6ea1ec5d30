use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Value};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one record per row
/// * `.json`    – `[{ "University Name": "...", "City": "...", ... }, ...]`
/// * `.parquet` – flat table of string, integer, float and boolean columns
pub fn load_file(path: &Path, name: &str) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(open(path)?, name),
        "json" => load_json(open(path)?, name),
        "parquet" | "pq" => load_parquet(path, name),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, then one record per row. Rows with a
/// different field count than the header are rejected.
pub fn load_csv<R: Read>(reader: R, name: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Value::from_raw).collect());
    }

    Dataset::from_records(name, headers, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). The key order of
/// the first record is the column order; every record must carry the same
/// keys.
pub fn load_json<R: Read>(reader: R, name: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    let Some(first) = records.first() else {
        return Err(LoadError::NoRows);
    };
    let headers: Vec<String> = first
        .as_object()
        .ok_or_else(|| LoadError::Malformed("row 0 is not a JSON object".into()))?
        .keys()
        .cloned()
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        if obj.len() != headers.len() {
            return Err(LoadError::Malformed(format!(
                "row {i} has {} keys, expected {}",
                obj.len(),
                headers.len()
            )));
        }
        let row = headers
            .iter()
            .map(|h| {
                obj.get(h)
                    .map(json_to_value)
                    .ok_or_else(|| LoadError::Malformed(format!("row {i} has no key '{h}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Dataset::from_records(name, headers, rows)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::from_raw(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => Value::Number(f),
            _ => Value::Text(n.to_string()),
        },
        JsonValue::Bool(b) => Value::Text(b.to_string()),
        JsonValue::Null => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars
/// (`df.write_parquet()`). Every column must be a scalar type.
fn load_parquet(path: &Path, name: &str) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            let values = batch
                .columns()
                .iter()
                .map(|col| extract_value(col, row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }
    }

    Dataset::from_records(name, headers, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Result<Value, LoadError> {
    if col.is_null(row) {
        return Ok(Value::Missing);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::from_raw(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Value::from_raw(col.as_string::<i64>().value(row)),
        DataType::Int8 => number(col.as_primitive::<Int8Type>().value(row) as f64),
        DataType::Int16 => number(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int32 => number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::UInt8 => number(col.as_primitive::<UInt8Type>().value(row) as f64),
        DataType::UInt16 => number(col.as_primitive::<UInt16Type>().value(row) as f64),
        DataType::UInt32 => number(col.as_primitive::<UInt32Type>().value(row) as f64),
        DataType::UInt64 => number(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Text(col.as_boolean().value(row).to_string()),
        other => {
            return Err(LoadError::Malformed(format!(
                "unsupported parquet column type {other:?}"
            )))
        }
    };
    Ok(value)
}

fn number(v: f64) -> Value {
    if v.is_finite() {
        Value::Number(v)
    } else {
        Value::Missing
    }
}
