//! Engine selector and the single-representation `Dataset`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;
use serde::{Deserialize, Serialize};

use crate::arrow::{
    record_batch_to_row_batch, row_batch_to_record_batch, schema_from_arrow, schema_to_arrow,
};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::types::RowBatch;

/// Which in-memory representation a dataset lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Arrow `RecordBatch`. Every reader produces this.
    #[default]
    Columnar,
    /// Typed row batch for row-wise interop.
    Legacy,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::Columnar, Engine::Legacy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Columnar => "columnar",
            Engine::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "columnar" | "primary" => Ok(Engine::Columnar),
            "legacy" | "secondary" => Ok(Engine::Legacy),
            _ => Err(Error::Config(format!(
                "engine must be one of [\"columnar\", \"legacy\"], got '{}'",
                s
            ))),
        }
    }
}

/// A tabular value held in exactly one engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Columnar(RecordBatch),
    Legacy(RowBatch),
}

impl From<RecordBatch> for Dataset {
    fn from(batch: RecordBatch) -> Self {
        Dataset::Columnar(batch)
    }
}

impl From<RowBatch> for Dataset {
    fn from(batch: RowBatch) -> Self {
        Dataset::Legacy(batch)
    }
}

impl Dataset {
    pub fn engine(&self) -> Engine {
        match self {
            Dataset::Columnar(_) => Engine::Columnar,
            Dataset::Legacy(_) => Engine::Legacy,
        }
    }

    pub fn num_rows(&self) -> usize {
        match self {
            Dataset::Columnar(b) => b.num_rows(),
            Dataset::Legacy(b) => b.num_rows(),
        }
    }

    pub fn num_columns(&self) -> usize {
        match self {
            Dataset::Columnar(b) => b.num_columns(),
            Dataset::Legacy(b) => b.num_columns(),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        match self {
            Dataset::Columnar(b) => b
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect(),
            Dataset::Legacy(b) => b.column_names(),
        }
    }

    /// Arrow view of the schema. Never fails: every legacy type has an Arrow
    /// counterpart.
    pub fn arrow_schema(&self) -> SchemaRef {
        match self {
            Dataset::Columnar(b) => b.schema(),
            Dataset::Legacy(b) => Arc::new(schema_to_arrow(&b.schema())),
        }
    }

    /// Legacy view of the schema; fails for Arrow types the legacy engine
    /// cannot hold.
    pub fn schema(&self) -> Result<Schema> {
        match self {
            Dataset::Columnar(b) => schema_from_arrow(b.schema().as_ref()),
            Dataset::Legacy(b) => Ok(b.schema()),
        }
    }

    /// Columnar copy of the data. Cheap (reference-counted) when already columnar.
    pub fn to_columnar(&self) -> Result<RecordBatch> {
        match self {
            Dataset::Columnar(b) => Ok(b.clone()),
            Dataset::Legacy(b) => row_batch_to_record_batch(b),
        }
    }

    pub fn to_legacy(&self) -> Result<RowBatch> {
        match self {
            Dataset::Columnar(b) => record_batch_to_row_batch(b),
            Dataset::Legacy(b) => Ok(b.clone()),
        }
    }

    /// A new dataset in `engine`; one conversion when the engines differ.
    pub fn converted(&self, engine: Engine) -> Result<Dataset> {
        match (self, engine) {
            (Dataset::Columnar(_), Engine::Legacy) => Ok(Dataset::Legacy(self.to_legacy()?)),
            (Dataset::Legacy(_), Engine::Columnar) => Ok(Dataset::Columnar(self.to_columnar()?)),
            _ => Ok(self.clone()),
        }
    }

    pub fn into_engine(self, engine: Engine) -> Result<Dataset> {
        if self.engine() == engine {
            return Ok(self);
        }
        self.converted(engine)
    }
}
