//! Workbook reader (xls / xlsx / ods via `calamine`) → Arrow `RecordBatch`.
//!
//! Options:
//! - `sheet_name` (string): sheet to read; wins over `sheet_id`
//! - `sheet_id` (integer, 1-based, default 1)
//! - `has_headers` (bool, default true): first row holds column names
//!
//! Excel date cells come through as their serial-day float value.

use std::path::Path;

use arrow_array::RecordBatch;
use calamine::{open_workbook_auto, Data, Reader};
use duoframe_core::arrow::row_batch_to_record_batch;
use duoframe_core::types::{RowBatch, Scalar};

use crate::error::{Error, Result};
use crate::options::FormatOptions;
use crate::readers::infer::unify_scalars;

pub fn read_excel(path: &Path, options: &FormatOptions) -> Result<RecordBatch> {
    let has_headers = options.get_bool("has_headers")?.unwrap_or(true);
    let mut workbook = open_workbook_auto(path)?;

    let range = match options.get_str("sheet_name")? {
        Some(name) => workbook.worksheet_range(name)?,
        None => {
            let id = options.get_usize("sheet_id")?.unwrap_or(1);
            if id == 0 {
                return Err(Error::InvalidOption {
                    key: "sheet_id".into(),
                    message: "sheet ids start at 1".into(),
                });
            }
            workbook.worksheet_range_at(id - 1).ok_or_else(|| Error::InvalidOption {
                key: "sheet_id".into(),
                message: format!("workbook has no sheet #{}", id),
            })??
        }
    };

    let mut rows = range.rows();
    let width = range.width();

    let names: Vec<String> = match (has_headers, rows.next()) {
        (true, Some(header)) => (0..width)
            .map(|i| match header.get(i) {
                Some(Data::Empty) | None => format!("column_{}", i + 1),
                Some(cell) => cell.to_string(),
            })
            .collect(),
        (false, Some(first)) => {
            // No header row: the first row is data.
            let names = (1..=width).map(|i| format!("column_{}", i)).collect();
            return finish(names, std::iter::once(first).chain(rows));
        }
        (_, None) => Vec::new(),
    };

    finish(names, rows)
}

fn finish<'a>(names: Vec<String>, rows: impl Iterator<Item = &'a [Data]>) -> Result<RecordBatch> {
    let mut cells: Vec<Vec<Scalar>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(row.get(i).map(cell_to_scalar).unwrap_or(Scalar::Null));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| unify_scalars(name, values))
        .collect();

    Ok(row_batch_to_record_batch(&RowBatch::try_new(columns)?)?)
}

fn cell_to_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Empty | Data::Error(_) => Scalar::Null,
        Data::Int(i) => Scalar::I64(*i),
        Data::Float(f) => Scalar::F64(*f),
        Data::Bool(b) => Scalar::Bool(*b),
        Data::String(s) if s.is_empty() => Scalar::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Str(s.clone()),
        Data::DateTime(dt) => Scalar::F64(dt.as_f64()),
        #[allow(unreachable_patterns)]
        _ => Scalar::Null,
    }
}
