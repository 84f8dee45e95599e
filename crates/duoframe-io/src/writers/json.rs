//! JSON-family writers.
//!
//! - `json`: text, array of row objects
//! - `jsonl` / `ndjson`: text, one row object per line
//! - `records`: in-memory `Value`, array of row objects
//! - `dict`: in-memory `Value`, object of column arrays
//!
//! Dates are rendered as ISO strings; `json` honors `pretty` (bool).

use arrow_array::RecordBatch;
use duoframe_core::types::{RowBatch, Scalar};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::options::FormatOptions;
use crate::readers::infer::scalar_to_text;
use crate::registry::Converted;
use crate::writers::text_rows;

pub fn write_json(batch: &RecordBatch, options: &FormatOptions) -> Result<Converted> {
    let records = Value::Array(row_objects(&text_rows(batch)?));
    let text = if options.get_bool("pretty")?.unwrap_or(false) {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    Ok(Converted::Text(text))
}

pub fn write_jsonl(batch: &RecordBatch, _options: &FormatOptions) -> Result<Converted> {
    let mut out = String::new();
    for obj in row_objects(&text_rows(batch)?) {
        out.push_str(&serde_json::to_string(&obj)?);
        out.push('\n');
    }
    Ok(Converted::Text(out))
}

pub fn write_records(batch: &RecordBatch, _options: &FormatOptions) -> Result<Converted> {
    Ok(Converted::Json(Value::Array(row_objects(
        &text_rows(batch)?,
    ))))
}

pub fn write_dict(batch: &RecordBatch, _options: &FormatOptions) -> Result<Converted> {
    let rows = text_rows(batch)?;
    let map: Map<String, Value> = rows
        .columns
        .iter()
        .map(|c| {
            (
                c.name.clone(),
                Value::Array(c.values.iter().map(scalar_to_json).collect()),
            )
        })
        .collect();
    Ok(Converted::Json(Value::Object(map)))
}

fn row_objects(rows: &RowBatch) -> Vec<Value> {
    rows.rows()
        .map(|row| {
            let obj: Map<String, Value> = rows
                .columns
                .iter()
                .zip(row)
                .map(|(c, v)| (c.name.clone(), scalar_to_json(v)))
                .collect();
            Value::Object(obj)
        })
        .collect()
}

fn scalar_to_json(v: &Scalar) -> Value {
    match v {
        Scalar::Date32(_) | Scalar::Date64(_) => Value::String(scalar_to_text(v)),
        other => other.to_json(),
    }
}
