//! Built-in writers. Each exposes a `WriteFn`-shaped entry point.

use arrow_array::{Array, RecordBatch};
use arrow_cast::display::{ArrayFormatter, FormatOptions as DisplayOptions};
use duoframe_core::arrow::{arrow_array_to_scalars, data_type_from_arrow};
use duoframe_core::schema::DataType;
use duoframe_core::types::{Column, RowBatch, Scalar};

use crate::error::Result;

pub mod csv;
pub mod json;
#[cfg(feature = "parquet")]
pub mod parquet;

/// Row view of `batch` for the text writers. Columns the legacy engine can
/// hold keep their type; anything else (timestamps, decimals, nested) is
/// rendered to `Utf8` with Arrow's display formatting.
pub(crate) fn text_rows(batch: &RecordBatch) -> Result<RowBatch> {
    let schema = batch.schema();
    let display = DisplayOptions::default();
    let mut columns = Vec::with_capacity(batch.num_columns());

    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let column = match data_type_from_arrow(field.data_type()) {
            Ok(data_type) => Column {
                name: field.name().clone(),
                data_type,
                nullable: field.is_nullable(),
                values: arrow_array_to_scalars(array)?,
            },
            Err(_) => {
                let formatter = ArrayFormatter::try_new(array.as_ref(), &display)?;
                let values = (0..array.len())
                    .map(|i| {
                        if array.is_null(i) {
                            Scalar::Null
                        } else {
                            Scalar::Str(formatter.value(i).to_string())
                        }
                    })
                    .collect();
                Column {
                    name: field.name().clone(),
                    data_type: DataType::Utf8,
                    nullable: field.is_nullable(),
                    values,
                }
            }
        };
        columns.push(column);
    }

    Ok(RowBatch::try_new(columns)?)
}
