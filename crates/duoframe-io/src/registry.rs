//! Name → function tables for readers and writers.
//!
//! Readers always produce the columnar engine. Writers always consume it.
//! Both tables are plain maps; callers may add or replace entries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use arrow_array::RecordBatch;
use serde_json::Value;

use crate::error::Result;
use crate::options::FormatOptions;
use crate::{readers, writers};

pub const CSV: &str = "csv";
pub const EXCEL: &str = "excel";

pub type ReadFn = fn(&Path, &FormatOptions) -> Result<RecordBatch>;
pub type WriteFn = fn(&RecordBatch, &FormatOptions) -> Result<Converted>;

/// Output of a writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl Converted {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Converted::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Converted::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        Ok(match self {
            Converted::Text(s) => s.into_bytes(),
            Converted::Bytes(b) => b,
            Converted::Json(v) => serde_json::to_vec_pretty(&v)?,
        })
    }

    pub fn write_to(self, path: &Path) -> Result<()> {
        fs::write(path, self.into_bytes()?)?;
        Ok(())
    }
}

pub struct ReaderRegistry {
    readers: HashMap<String, ReadFn>,
}

impl ReaderRegistry {
    /// Registry with the built-in readers.
    pub fn new() -> Self {
        let mut r = Self::empty();
        r.register(CSV, readers::csv::read_csv);
        r.register("json", readers::json::read_json);
        r.register("jsonl", readers::json::read_jsonl);
        r.register("ndjson", readers::json::read_jsonl);
        r.register(EXCEL, readers::excel::read_excel);
        #[cfg(feature = "parquet")]
        r.register("parquet", readers::parquet::read_parquet);
        r
    }

    pub fn empty() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, f: ReadFn) {
        self.readers.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<ReadFn> {
        self.readers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.readers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WriterRegistry {
    writers: HashMap<String, WriteFn>,
}

impl WriterRegistry {
    /// Registry with the built-in writers.
    pub fn new() -> Self {
        let mut r = Self::empty();
        r.register(CSV, writers::csv::write_csv);
        r.register("json", writers::json::write_json);
        r.register("jsonl", writers::json::write_jsonl);
        r.register("ndjson", writers::json::write_jsonl);
        r.register("records", writers::json::write_records);
        r.register("dict", writers::json::write_dict);
        #[cfg(feature = "parquet")]
        r.register("parquet", writers::parquet::write_parquet);
        r
    }

    pub fn empty() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, f: WriteFn) {
        self.writers.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<WriteFn> {
        self.writers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.writers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.writers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
