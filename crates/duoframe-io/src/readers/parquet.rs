//! Parquet reader with column projection (enabled with `--features parquet`).
//!
//! Options:
//! - `columns` (list of names): only read these root columns, in file order
//! - `batch_size` (integer, default 8192): rows per decoded batch
//! - `n_rows` (integer): stop after this many rows
//!
//! All decoded batches are concatenated into one `RecordBatch`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::{Schema as ArrowSchema, SchemaRef};
use arrow_select::concat::concat_batches;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;

use crate::error::{Error, Result};
use crate::options::FormatOptions;

const DEFAULT_BATCH_SIZE: usize = 8192;

pub fn read_parquet(path: &Path, options: &FormatOptions) -> Result<RecordBatch> {
    let projection = options.get_str_list("columns")?;
    let batch_size = options.get_positive_usize("batch_size")?.unwrap_or(DEFAULT_BATCH_SIZE);
    let mut reader = ParquetReader::from_path(path, projection, batch_size)?;
    if let Some(n) = options.get_usize("n_rows")? {
        reader.limit = Some(n);
    }
    reader.read_all()
}

pub struct ParquetReader {
    reader: ParquetRecordBatchReader,
    schema: SchemaRef,
    limit: Option<usize>,
}

impl ParquetReader {
    /// # Arguments
    /// * `path` - Path to the Parquet file
    /// * `projection` - Optional column names to project (if None, reads all columns)
    /// * `batch_size` - Number of rows per batch
    pub fn from_path(
        path: &Path,
        projection: Option<Vec<String>>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidOption {
                key: "batch_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let file_schema = builder.schema().clone();

        let projection_indices = projection
            .map(|cols| {
                cols.iter()
                    .map(|name| {
                        file_schema.index_of(name).map_err(|_| {
                            Error::Core(duoframe_core::Error::ColumnNotFound(name.clone()))
                        })
                    })
                    .collect::<Result<Vec<usize>>>()
            })
            .transpose()?;

        let builder = match &projection_indices {
            Some(indices) => {
                let mask = ProjectionMask::roots(
                    builder.metadata().file_metadata().schema_descr(),
                    indices.clone(),
                );
                builder.with_projection(mask)
            }
            None => builder,
        };

        let reader = builder.with_batch_size(batch_size).build()?;

        // Projected columns come back in file order.
        let schema = match projection_indices {
            Some(mut indices) => {
                indices.sort_unstable();
                indices.dedup();
                let fields: Vec<_> = indices
                    .iter()
                    .map(|&i| file_schema.field(i).clone())
                    .collect();
                Arc::new(ArrowSchema::new(fields))
            }
            None => file_schema,
        };

        Ok(Self {
            reader,
            schema,
            limit: None,
        })
    }

    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    /// Read the next decoded batch; `None` once the file is exhausted.
    pub fn next_record_batch(&mut self) -> Result<Option<RecordBatch>> {
        Ok(self.reader.next().transpose()?)
    }

    /// Read and concatenate every remaining batch, honoring the row limit.
    pub fn read_all(mut self) -> Result<RecordBatch> {
        let mut batches = Vec::new();
        let mut rows = 0usize;
        while let Some(batch) = self.next_record_batch()? {
            let batch = match self.limit {
                Some(limit) if rows + batch.num_rows() > limit => batch.slice(0, limit - rows),
                _ => batch,
            };
            rows += batch.num_rows();
            batches.push(batch);
            if self.limit.is_some_and(|limit| rows >= limit) {
                break;
            }
        }

        let schema = batches
            .first()
            .map(|b| b.schema())
            .unwrap_or_else(|| self.schema());
        Ok(concat_batches(&schema, &batches)?)
    }
}
