//! Conversions between the legacy `RowBatch` and Arrow `RecordBatch`.
//!
//! Both directions allocate a fresh value; neither touches its input.
//! Column types travel with the legacy columns, so
//! `record_batch_to_row_batch` followed by `row_batch_to_record_batch`
//! reproduces the original batch for every supported type.

use std::sync::Arc;

use arrow_array::builder::{
    BinaryBuilder, BooleanBuilder, Date32Builder, Date64Builder, Float32Builder, Float64Builder,
    Int32Builder, Int64Builder, StringBuilder,
};
use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Date64Array, Float32Array,
    Float64Array, Int32Array, Int64Array, LargeBinaryArray, LargeStringArray, RecordBatch,
    StringArray,
};
use arrow_schema::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use crate::types::{Column, RowBatch, Scalar};

/// Convert a `DataType` to an Arrow `DataType`.
pub fn data_type_to_arrow(dt: &DataType) -> ArrowDataType {
    match dt {
        DataType::Boolean => ArrowDataType::Boolean,
        DataType::Int32 => ArrowDataType::Int32,
        DataType::Int64 => ArrowDataType::Int64,
        DataType::Float32 => ArrowDataType::Float32,
        DataType::Float64 => ArrowDataType::Float64,
        DataType::Utf8 => ArrowDataType::Utf8,
        DataType::Binary => ArrowDataType::Binary,
        DataType::Date32 => ArrowDataType::Date32,
        DataType::Date64 => ArrowDataType::Date64,
    }
}

/// Map an Arrow type onto the logical types the legacy engine can hold.
///
/// Large string/binary variants collapse onto their 32-bit-offset forms.
pub fn data_type_from_arrow(dt: &ArrowDataType) -> Result<DataType> {
    Ok(match dt {
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Int32 => DataType::Int32,
        ArrowDataType::Int64 => DataType::Int64,
        ArrowDataType::Float32 => DataType::Float32,
        ArrowDataType::Float64 => DataType::Float64,
        ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => DataType::Utf8,
        ArrowDataType::Binary | ArrowDataType::LargeBinary => DataType::Binary,
        ArrowDataType::Date32 => DataType::Date32,
        ArrowDataType::Date64 => DataType::Date64,
        other => {
            return Err(Error::Schema(format!(
                "Arrow type {:?} has no legacy-engine equivalent",
                other
            )))
        }
    })
}

/// Convert a `Schema` to an Arrow `Schema`.
pub fn schema_to_arrow(schema: &Schema) -> ArrowSchema {
    let fields: Vec<ArrowField> = schema
        .fields
        .iter()
        .map(|f| ArrowField::new(f.name.clone(), data_type_to_arrow(&f.data_type), f.nullable))
        .collect();
    ArrowSchema::new(fields)
}

/// Convert an Arrow `Schema` to a `Schema`.
pub fn schema_from_arrow(schema: &ArrowSchema) -> Result<Schema> {
    let fields = schema
        .fields()
        .iter()
        .map(|f| {
            Ok(Field::new(
                f.name().clone(),
                data_type_from_arrow(f.data_type())?,
                f.is_nullable(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::new(fields))
}

/// Append compatibility on Arrow schemas: same names in the same order, with
/// types equal once `LargeUtf8`/`LargeBinary` are read as their 32-bit-offset
/// forms. Nullability is not compared. Types the legacy engine cannot hold
/// (timestamps, decimals, nested) are compared as-is.
pub fn check_append_arrow_schema(left: &ArrowSchema, right: &ArrowSchema) -> Result<()> {
    let same = left.fields().len() == right.fields().len()
        && left
            .fields()
            .iter()
            .zip(right.fields().iter())
            .all(|(l, r)| l.name() == r.name() && same_storage(l.data_type(), r.data_type()));
    if same {
        Ok(())
    } else {
        Err(Error::SchemaMismatch {
            left: left.fields().iter().map(|f| f.name().clone()).collect(),
            right: right.fields().iter().map(|f| f.name().clone()).collect(),
        })
    }
}

fn same_storage(a: &ArrowDataType, b: &ArrowDataType) -> bool {
    use ArrowDataType::{Binary, LargeBinary, LargeUtf8, Utf8};
    match (a, b) {
        (Utf8 | LargeUtf8, Utf8 | LargeUtf8) => true,
        (Binary | LargeBinary, Binary | LargeBinary) => true,
        _ => a == b,
    }
}

/// Convert a `RowBatch` to an Arrow `RecordBatch`.
pub fn row_batch_to_record_batch(batch: &RowBatch) -> Result<RecordBatch> {
    let arrow_schema = Arc::new(schema_to_arrow(&batch.schema()));
    if batch.columns.is_empty() {
        return Ok(RecordBatch::new_empty(arrow_schema));
    }

    let arrays = batch
        .columns
        .iter()
        .map(column_to_arrow_array)
        .collect::<Result<Vec<ArrayRef>>>()?;

    Ok(RecordBatch::try_new(arrow_schema, arrays)?)
}

/// Convert an Arrow `RecordBatch` to a `RowBatch`.
///
/// This materializes every cell, so it costs one `Scalar` per value.
pub fn record_batch_to_row_batch(batch: &RecordBatch) -> Result<RowBatch> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(batch.num_columns());

    for (i, field) in schema.fields().iter().enumerate() {
        let data_type = data_type_from_arrow(field.data_type())?;
        let values = arrow_array_to_scalars(batch.column(i))?;
        columns.push(Column {
            name: field.name().clone(),
            data_type,
            nullable: field.is_nullable(),
            values,
        });
    }

    Ok(RowBatch { columns })
}

fn column_to_arrow_array(column: &Column) -> Result<ArrayRef> {
    let n = column.values.len();
    let mismatch = |v: &Scalar| {
        Error::Schema(format!(
            "column '{}': expected {:?}, got {:?}",
            column.name, column.data_type, v
        ))
    };

    let array: ArrayRef = match column.data_type {
        DataType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::Bool(b) => builder.append_value(*b),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Int32 => {
            let mut builder = Int32Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::I32(i) => builder.append_value(*i),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Int64 => {
            let mut builder = Int64Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::I32(i) => builder.append_value(*i as i64),
                    Scalar::I64(i) => builder.append_value(*i),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float32 => {
            let mut builder = Float32Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::F32(f) => builder.append_value(*f),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::F32(f) => builder.append_value(*f as f64),
                    Scalar::F64(f) => builder.append_value(*f),
                    Scalar::I32(i) => builder.append_value(*i as f64),
                    Scalar::I64(i) => builder.append_value(*i as f64),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Utf8 => {
            let mut builder = StringBuilder::with_capacity(n, n * 8);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::Str(s) => builder.append_value(s),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Binary => {
            let mut builder = BinaryBuilder::with_capacity(n, n * 8);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::Bin(b) => builder.append_value(b),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Date32 => {
            let mut builder = Date32Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::Date32(d) => builder.append_value(*d),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Date64 => {
            let mut builder = Date64Builder::with_capacity(n);
            for v in &column.values {
                match v {
                    Scalar::Null => builder.append_null(),
                    Scalar::Date64(d) => builder.append_value(*d),
                    other => return Err(mismatch(other)),
                }
            }
            Arc::new(builder.finish())
        }
    };

    if !column.nullable && array.null_count() > 0 {
        return Err(Error::Schema(format!(
            "Null value in non-nullable column '{}'",
            column.name
        )));
    }
    Ok(array)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, what: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::Schema(format!("Failed to cast to {}", what)))
}

/// Convert an Arrow array into one `Scalar` per row.
pub fn arrow_array_to_scalars(array: &ArrayRef) -> Result<Vec<Scalar>> {
    let n = array.len();
    let mut values = Vec::with_capacity(n);

    macro_rules! collect {
        ($arr:ty, $variant:expr) => {{
            let arr = downcast::<$arr>(array, stringify!($arr))?;
            for i in 0..n {
                if arr.is_null(i) {
                    values.push(Scalar::Null);
                } else {
                    values.push($variant(arr.value(i)));
                }
            }
        }};
    }

    match array.data_type() {
        ArrowDataType::Boolean => collect!(BooleanArray, Scalar::Bool),
        ArrowDataType::Int32 => collect!(Int32Array, Scalar::I32),
        ArrowDataType::Int64 => collect!(Int64Array, Scalar::I64),
        ArrowDataType::Float32 => collect!(Float32Array, Scalar::F32),
        ArrowDataType::Float64 => collect!(Float64Array, Scalar::F64),
        ArrowDataType::Utf8 => collect!(StringArray, |s: &str| Scalar::Str(s.to_string())),
        ArrowDataType::LargeUtf8 => {
            collect!(LargeStringArray, |s: &str| Scalar::Str(s.to_string()))
        }
        ArrowDataType::Binary => collect!(BinaryArray, |b: &[u8]| Scalar::Bin(b.to_vec())),
        ArrowDataType::LargeBinary => {
            collect!(LargeBinaryArray, |b: &[u8]| Scalar::Bin(b.to_vec()))
        }
        ArrowDataType::Date32 => collect!(Date32Array, Scalar::Date32),
        ArrowDataType::Date64 => collect!(Date64Array, Scalar::Date64),
        other => {
            return Err(Error::Schema(format!(
                "Unsupported Arrow data type: {:?}",
                other
            )))
        }
    }

    Ok(values)
}
