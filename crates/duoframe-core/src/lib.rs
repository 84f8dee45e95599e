#![forbid(unsafe_code)]
//! duoframe-core: shared kernel for duoframe.
//!
//! This crate contains only *pure* types and conversions. There is **no file
//! I/O** here; readers, writers and archive handling live in `duoframe-io`.
//!
//! - `engine`: the two-value `Engine` selector and the `Dataset` that holds
//!   exactly one representation.
//! - `types`: the legacy (row-oriented) engine: `Scalar`, `Column`, `RowBatch`.
//! - `arrow`: lossless conversion between `RowBatch` and Arrow `RecordBatch`.
//! - `config`: `FrameConfig` with env overrides.
//!
//! Crates that use this:
//! - duoframe-io: readers/writers produce and consume `RecordBatch`.
//! - duoframe-frame: the `Frame` wrapper and loader.

pub mod arrow;
pub mod config;
pub mod engine;
pub mod error;
pub mod schema;
pub mod types;

pub use engine::{Dataset, Engine};
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
