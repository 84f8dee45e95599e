#![forbid(unsafe_code)]
//! duoframe-io: everything that touches files.
//!
//! - `registry`: name → reader / writer function tables.
//! - `resolve`: picks a reader (or writer) from an explicit hint or the path suffix.
//! - `archive`: extracts a zip into a scoped temp dir and hands out one member's path.
//! - `readers`: csv / json / jsonl / parquet / excel → Arrow `RecordBatch`.
//! - `writers`: Arrow `RecordBatch` → csv / json / jsonl / records / dict / parquet.
//!
//! Parquet entries are feature-gated (`parquet`, on by default).

pub mod archive;
pub mod error;
pub mod options;
pub mod readers;
pub mod registry;
pub mod resolve;
pub mod writers;

pub use archive::{open_member, with_member, ArchiveMember};
pub use error::{Error, Result};
pub use options::FormatOptions;
pub use registry::{Converted, ReadFn, ReaderRegistry, WriteFn, WriterRegistry};
pub use resolve::{resolve_reader, resolve_writer, Resolved};
