//! Built-in readers. Each exposes a `ReadFn`-shaped entry point.

pub mod csv;
pub mod excel;
pub mod infer;
pub mod json;
#[cfg(feature = "parquet")]
pub mod parquet;
