//! CSV reader → Arrow `RecordBatch`.
//!
//! Options:
//! - `has_headers` (bool, default true): without headers, columns are named
//!   `column_1`, `column_2`, ...
//! - `delimiter` (single character, default `,`)
//! - `infer_types` (bool, default true): Int64 / Float64 / Boolean / Date32
//!   inference; otherwise every column is Utf8
//! - `columns` (list of names): keep only these, in this order
//! - `n_rows` (integer): stop after this many data rows
//!
//! Empty cells are nulls. Short rows are padded with nulls.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow_array::RecordBatch;
use csv as csv_crate;
use duoframe_core::arrow::row_batch_to_record_batch;
use duoframe_core::types::RowBatch;

use crate::error::{Error, Result};
use crate::options::FormatOptions;
use crate::readers::infer::infer_text_column;

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub has_headers: bool,
    pub delimiter: u8,
    pub infer_types: bool,
    pub columns: Option<Vec<String>>,
    pub n_rows: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
            infer_types: true,
            columns: None,
            n_rows: None,
        }
    }
}

impl CsvOptions {
    pub fn from_options(options: &FormatOptions) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            has_headers: options.get_bool("has_headers")?.unwrap_or(d.has_headers),
            delimiter: options.get_byte("delimiter")?.unwrap_or(d.delimiter),
            infer_types: options.get_bool("infer_types")?.unwrap_or(d.infer_types),
            columns: options.get_str_list("columns")?,
            n_rows: options.get_usize("n_rows")?,
        })
    }
}

/// `ReadFn` entry point.
pub fn read_csv(path: &Path, options: &FormatOptions) -> Result<RecordBatch> {
    let opts = CsvOptions::from_options(options)?;
    let batch = CsvReader::from_path(path, opts)?.read_all()?;
    Ok(row_batch_to_record_batch(&batch)?)
}

pub struct CsvReader<R: Read> {
    rdr: csv_crate::Reader<R>,
    opts: CsvOptions,
}

impl CsvReader<File> {
    pub fn from_path(path: &Path, opts: CsvOptions) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, opts))
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R, opts: CsvOptions) -> Self {
        let rdr = csv_crate::ReaderBuilder::new()
            .has_headers(opts.has_headers)
            .delimiter(opts.delimiter)
            .flexible(true)
            .from_reader(reader);
        Self { rdr, opts }
    }

    /// Read every remaining record into one typed `RowBatch`.
    pub fn read_all(mut self) -> Result<RowBatch> {
        let mut headers: Vec<String> = if self.opts.has_headers {
            self.rdr.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let limit = self.opts.n_rows.unwrap_or(usize::MAX);
        let mut read_rows = 0usize;

        for rec in self.rdr.records() {
            if read_rows >= limit {
                break;
            }
            let rec = rec?;
            // Headerless files take their width from the widest row seen.
            while headers.len() < rec.len() && !self.opts.has_headers {
                headers.push(format!("column_{}", headers.len() + 1));
                cells.push(vec![None; read_rows]);
            }
            for (i, col) in cells.iter_mut().enumerate() {
                let v = rec
                    .get(i)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string());
                col.push(v);
            }
            read_rows += 1;
        }

        let mut columns: Vec<_> = headers
            .into_iter()
            .zip(cells)
            .map(|(name, col)| infer_text_column(name, col, self.opts.infer_types))
            .collect();

        if let Some(wanted) = &self.opts.columns {
            columns = wanted
                .iter()
                .map(|name| {
                    columns
                        .iter()
                        .find(|c| &c.name == name)
                        .cloned()
                        .ok_or_else(|| Error::Core(duoframe_core::Error::ColumnNotFound(name.clone())))
                })
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(RowBatch::try_new(columns)?)
    }
}
