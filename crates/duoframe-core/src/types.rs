//! The legacy engine: typed columns of `Scalar` values, read row by row.
//!
//! Each `Column` keeps its `DataType` and nullability so converting to Arrow
//! and back is lossless, including for empty or all-null columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Date32(i32),
    Date64(i64),
}

impl Scalar {
    /// Logical type of a non-null value; `None` for `Null`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::I32(_) => Some(DataType::Int32),
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F32(_) => Some(DataType::Float32),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
            Scalar::Bin(_) => Some(DataType::Binary),
            Scalar::Date32(_) => Some(DataType::Date32),
            Scalar::Date64(_) => Some(DataType::Date64),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I32(i) => Some(*i as f64),
            Scalar::I64(i) => Some(*i as f64),
            Scalar::F32(f) => Some(*f as f64),
            Scalar::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// JSON view of the value. Dates stay numeric (epoch days / millis);
    /// binary becomes an array of bytes.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::I32(i) => Value::from(*i),
            Scalar::I64(i) => Value::from(*i),
            Scalar::F32(f) => serde_json::Number::from_f64(*f as f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::F64(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Str(s) => Value::String(s.clone()),
            Scalar::Bin(b) => Value::Array(b.iter().map(|x| Value::from(*x)).collect()),
            Scalar::Date32(d) => Value::from(*d),
            Scalar::Date64(d) => Value::from(*d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub values: Vec<Scalar>,
}

impl Column {
    /// Nullable column of the given type.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            values,
        }
    }

    pub fn field(&self) -> Field {
        Field::new(self.name.clone(), self.data_type, self.nullable)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Row-oriented table of typed columns (the legacy engine).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    /// Build a batch, checking that every column has the same length.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(Column::field).collect())
    }

    /// Values of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<&Scalar>> {
        if idx >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Scalar>> + '_ {
        (0..self.num_rows()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Row-wise concatenation of `self` then `other`.
    ///
    /// Column names, order and types must match exactly.
    pub fn concat(&self, other: &RowBatch) -> Result<RowBatch> {
        check_append_schema(&self.schema(), &other.schema())?;
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| {
                let mut values = Vec::with_capacity(a.len() + b.len());
                values.extend_from_slice(&a.values);
                values.extend_from_slice(&b.values);
                Column {
                    name: a.name.clone(),
                    data_type: a.data_type,
                    nullable: a.nullable || b.nullable,
                    values,
                }
            })
            .collect();
        Ok(RowBatch { columns })
    }
}

/// Append compatibility: same names in the same order with the same types.
/// Nullability is not compared.
pub fn check_append_schema(left: &Schema, right: &Schema) -> Result<()> {
    let same = left.fields.len() == right.fields.len()
        && left
            .fields
            .iter()
            .zip(&right.fields)
            .all(|(l, r)| l.name == r.name && l.data_type == r.data_type);
    if same {
        Ok(())
    } else {
        Err(Error::SchemaMismatch {
            left: left.names(),
            right: right.names(),
        })
    }
}
