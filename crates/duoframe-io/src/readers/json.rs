//! JSON (array of objects) and NDJSON readers → Arrow `RecordBatch`.
//!
//! Columns are the union of object keys in first-seen order. Missing keys are
//! nulls. Integers and floats in one column unify to Float64; other mixes,
//! arrays and nested objects become strings.
//!
//! Options: `columns` (list of names), `n_rows` (integer).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use arrow_array::RecordBatch;
use duoframe_core::arrow::row_batch_to_record_batch;
use duoframe_core::types::{RowBatch, Scalar};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::options::FormatOptions;
use crate::readers::infer::unify_scalars;

pub fn read_json(path: &Path, options: &FormatOptions) -> Result<RecordBatch> {
    let value: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let objects = match value {
        Value::Array(items) => items
            .into_iter()
            .map(into_object)
            .collect::<Result<Vec<_>>>()?,
        Value::Object(map) => vec![map],
        other => {
            return Err(Error::Schema(format!(
                "expected a JSON array of objects, got {}",
                kind(&other)
            )))
        }
    };
    build(objects, options)
}

pub fn read_jsonl(path: &Path, options: &FormatOptions) -> Result<RecordBatch> {
    let reader = BufReader::new(File::open(path)?);
    let limit = options.get_usize("n_rows")?.unwrap_or(usize::MAX);
    let mut objects = Vec::new();
    for line in reader.lines() {
        if objects.len() >= limit {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        objects.push(into_object(serde_json::from_str(&line)?)?);
    }
    build(objects, options)
}

fn into_object(v: Value) -> Result<Map<String, Value>> {
    match v {
        Value::Object(map) => Ok(map),
        other => Err(Error::Schema(format!(
            "expected a JSON object per row, got {}",
            kind(&other)
        ))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn build(mut objects: Vec<Map<String, Value>>, options: &FormatOptions) -> Result<RecordBatch> {
    if let Some(limit) = options.get_usize("n_rows")? {
        objects.truncate(limit);
    }

    let names: Vec<String> = match options.get_str_list("columns")? {
        Some(wanted) => wanted,
        None => {
            let mut names: Vec<String> = Vec::new();
            for obj in &objects {
                for k in obj.keys() {
                    if !names.iter().any(|n| n == k) {
                        names.push(k.clone());
                    }
                }
            }
            names
        }
    };

    let columns = names
        .into_iter()
        .map(|name| {
            let values = objects
                .iter_mut()
                .map(|obj| obj.remove(&name).map(to_scalar).unwrap_or(Scalar::Null))
                .collect();
            unify_scalars(name, values)
        })
        .collect();

    Ok(row_batch_to_record_batch(&RowBatch::try_new(columns)?)?)
}

fn to_scalar(v: Value) -> Scalar {
    match v {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::I64(i)
            } else if let Some(f) = n.as_f64() {
                Scalar::F64(f)
            } else {
                Scalar::Str(n.to_string())
            }
        }
        Value::String(s) => Scalar::Str(s),
        // Arrays/objects → stringified
        other => Scalar::Str(other.to_string()),
    }
}
