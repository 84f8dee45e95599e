//! CSV writer from a `RecordBatch`.
//!
//! Options: `has_headers` (bool, default true), `delimiter` (single character,
//! default `,`). Nulls are written as empty fields, dates as `YYYY-MM-DD`.

use std::io::Write;

use arrow_array::RecordBatch;
use csv as csv_crate;
use duoframe_core::types::RowBatch;

use crate::error::Result;
use crate::options::FormatOptions;
use crate::readers::infer::scalar_to_text;
use crate::registry::Converted;
use crate::writers::text_rows;

pub fn write_csv(batch: &RecordBatch, options: &FormatOptions) -> Result<Converted> {
    let has_headers = options.get_bool("has_headers")?.unwrap_or(true);
    let delimiter = options.get_byte("delimiter")?.unwrap_or(b',');

    let rows = text_rows(batch)?;
    let mut out = Vec::new();
    {
        let mut writer = CsvWriter::to_writer(&mut out, delimiter, !has_headers);
        writer.write_batch(&rows)?;
    }
    Ok(Converted::Text(String::from_utf8_lossy(&out).into_owned()))
}

pub struct CsvWriter<W: Write> {
    wtr: csv_crate::Writer<W>,
    wrote_header: bool,
}

impl<W: Write> CsvWriter<W> {
    /// `skip_header` writes data rows only.
    pub fn to_writer(writer: W, delimiter: u8, skip_header: bool) -> Self {
        Self {
            wtr: csv_crate::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(writer),
            wrote_header: skip_header,
        }
    }

    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        if !self.wrote_header {
            let headers: Vec<&str> = batch.columns.iter().map(|c| c.name.as_str()).collect();
            self.wtr.write_record(headers)?;
            self.wrote_header = true;
        }
        for row in batch.rows() {
            let record: Vec<String> = row.into_iter().map(scalar_to_text).collect();
            self.wtr.write_record(&record)?;
        }
        self.wtr.flush()?;
        Ok(())
    }
}
