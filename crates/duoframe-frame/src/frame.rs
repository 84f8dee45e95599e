//! The `Frame` wrapper.
//!
//! A frame is columnar-backed or legacy-backed depending on which `Dataset`
//! variant it stores. `into_engine` moves between the two; nothing else
//! changes the representation. All operations leave `self` untouched.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_cast::cast;
use arrow_cast::pretty::pretty_format_batches;
use arrow_schema::{DataType as ArrowDataType, Field, Schema as ArrowSchema};
use arrow_select::concat::concat_batches;

use duoframe_core::arrow::{arrow_array_to_scalars, check_append_arrow_schema, data_type_from_arrow};
use duoframe_core::types::{RowBatch, Scalar};
use duoframe_core::{Dataset, Engine, Error as CoreError};
use duoframe_io::{resolve_writer, Converted, Error as IoError, FormatOptions, WriterRegistry};

use crate::error::Result;
use crate::provenance::{FileMetadata, Provenance};
use crate::timeseries::TimeSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Dataset,
    provenance: Provenance,
}

impl Frame {
    /// In-memory frame with no source file.
    pub fn new(data: impl Into<Dataset>) -> Self {
        Self::with_provenance(data, Provenance::Memory)
    }

    pub fn with_provenance(data: impl Into<Dataset>, provenance: Provenance) -> Self {
        Self {
            data: data.into(),
            provenance,
        }
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn into_data(self) -> Dataset {
        self.data
    }

    pub fn engine(&self) -> Engine {
        self.data.engine()
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.data.num_rows(), self.data.num_columns())
    }

    /// Column names in source order.
    pub fn columns(&self) -> Vec<String> {
        self.data.column_names()
    }

    pub fn len(&self) -> usize {
        self.data.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.num_rows() == 0
    }

    /// Size and modification time of the source file, if there is one and it
    /// still exists. Archive-loaded frames report the archive.
    pub fn metadata(&self) -> Option<FileMetadata> {
        self.provenance.metadata()
    }

    /// The data in `engine`: borrowed when it is already there, converted
    /// otherwise.
    pub fn as_engine(&self, engine: Engine) -> Result<Cow<'_, Dataset>> {
        if self.data.engine() == engine {
            return Ok(Cow::Borrowed(&self.data));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(from = %self.data.engine(), to = %engine, "engine conversion");

        Ok(Cow::Owned(self.data.converted(engine)?))
    }

    /// The same frame backed by `engine`. Provenance is kept.
    pub fn into_engine(self, engine: Engine) -> Result<Frame> {
        let Frame { data, provenance } = self;
        Ok(Frame {
            data: data.into_engine(engine)?,
            provenance,
        })
    }

    pub fn to_columnar(&self) -> Result<RecordBatch> {
        Ok(self.data.to_columnar()?)
    }

    pub fn to_legacy(&self) -> Result<RowBatch> {
        Ok(self.data.to_legacy()?)
    }

    /// Serialize with the built-in writer named `target`.
    pub fn convert(&self, target: &str, options: &FormatOptions) -> Result<Converted> {
        self.convert_with(&WriterRegistry::new(), target, options)
    }

    /// Serialize with a writer from `writers`. An unknown `target` is
    /// `UnsupportedConversion` and nothing is converted.
    pub fn convert_with(
        &self,
        writers: &WriterRegistry,
        target: &str,
        options: &FormatOptions,
    ) -> Result<Converted> {
        let write = writers
            .get(target)
            .ok_or_else(|| IoError::UnsupportedConversion(target.to_string()))?;
        let batch = self.to_columnar()?;
        Ok(write(&batch, options)?)
    }

    /// Write to `path`, picking the writer from `hint` or the path suffix the
    /// same way readers are picked.
    pub fn write_to_path(
        &self,
        path: impl AsRef<Path>,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let writers = WriterRegistry::new();
        let writer = resolve_writer(&writers, path, hint)?;
        let batch = self.to_columnar()?;
        (writer.func)(&batch, options)?.write_to(path)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), writer = %writer.name, rows = batch.num_rows(), "wrote frame");

        Ok(())
    }

    /// Rows of `self` followed by rows of `other`.
    ///
    /// Column names, order and types must match exactly; the result keeps
    /// `self`'s engine and provenance. Columnar frames are compared on their
    /// Arrow schemas, so types without a legacy counterpart append fine.
    pub fn append(&self, other: &Frame) -> Result<Frame> {
        check_append_arrow_schema(&self.data.arrow_schema(), &other.data.arrow_schema())?;

        let data = match &self.data {
            Dataset::Columnar(left) => {
                let right = other.data.to_columnar()?;
                Dataset::Columnar(append_batches(left, &right)?)
            }
            Dataset::Legacy(left) => Dataset::Legacy(left.concat(&other.data.to_legacy()?)?),
        };

        Ok(Frame {
            data,
            provenance: self.provenance.clone(),
        })
    }

    /// `(date, value)` pairs sorted ascending by date.
    ///
    /// Both columns must exist (`ColumnNotFound` otherwise, date checked
    /// first). Dates may be `Date32`/`Date64`, timestamps (truncated to the
    /// day) or ISO strings.
    pub fn project_timeseries(&self, date_col: &str, value_col: &str) -> Result<TimeSeries> {
        let schema = self.data.arrow_schema();
        let date_idx = schema
            .index_of(date_col)
            .map_err(|_| CoreError::ColumnNotFound(date_col.to_string()))?;
        let value_idx = schema
            .index_of(value_col)
            .map_err(|_| CoreError::ColumnNotFound(value_col.to_string()))?;

        let (dates, values, value_type) = match &self.data {
            Dataset::Columnar(batch) => (
                date_scalars(batch.column(date_idx))?,
                arrow_array_to_scalars(batch.column(value_idx))?,
                data_type_from_arrow(schema.field(value_idx).data_type())?,
            ),
            Dataset::Legacy(batch) => {
                let date = &batch.columns[date_idx];
                let value = &batch.columns[value_idx];
                (date.values.clone(), value.values.clone(), value.data_type)
            }
        };

        TimeSeries::from_columns(date_col, dates, value_type, values)
    }
}

fn date_scalars(array: &ArrayRef) -> Result<Vec<Scalar>> {
    if let ArrowDataType::Timestamp(_, _) = array.data_type() {
        let days = cast(array.as_ref(), &ArrowDataType::Date32).map_err(CoreError::from)?;
        return Ok(arrow_array_to_scalars(&days)?);
    }
    Ok(arrow_array_to_scalars(array)?)
}

/// Concatenate two schema-compatible batches. The result's fields are
/// nullable where either side's is; right-hand columns with a different Arrow
/// encoding of the same logical type (e.g. `LargeUtf8`) are cast first.
fn append_batches(left: &RecordBatch, right: &RecordBatch) -> Result<RecordBatch> {
    let ls = left.schema();
    let rs = right.schema();
    let fields: Vec<Field> = ls
        .fields()
        .iter()
        .zip(rs.fields().iter())
        .map(|(l, r)| {
            l.as_ref()
                .clone()
                .with_nullable(l.is_nullable() || r.is_nullable())
        })
        .collect();
    let schema = Arc::new(ArrowSchema::new_with_metadata(fields, ls.metadata().clone()));

    let mut columns = Vec::with_capacity(right.num_columns());
    for (i, field) in schema.fields().iter().enumerate() {
        let col = right.column(i);
        if col.data_type() == field.data_type() {
            columns.push(col.clone());
        } else {
            columns.push(cast(col.as_ref(), field.data_type()).map_err(CoreError::from)?);
        }
    }
    let right = RecordBatch::try_new_with_options(
        schema.clone(),
        columns,
        &RecordBatchOptions::new().with_row_count(Some(right.num_rows())),
    )
    .map_err(CoreError::from)?;

    Ok(concat_batches(&schema, [left, &right]).map_err(CoreError::from)?)
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self
            .to_columnar()
            .and_then(|batch| Ok(pretty_format_batches(&[batch]).map_err(CoreError::from)?));
        match table {
            Ok(table) => write!(f, "{}", table),
            Err(e) => write!(f, "<frame not displayable: {}>", e),
        }
    }
}
