#![forbid(unsafe_code)]
//! duoframe-frame: the engine-agnostic `Frame`.
//!
//! A `Frame` holds one `Dataset` (Arrow columnar or typed legacy rows) plus
//! where it came from. Frames are never mutated; `into_engine`, `append` and
//! friends return new values.
//!
//! ```rust,no_run
//! use duoframe_core::Engine;
//! use duoframe_frame::{Frame, Loader};
//! use duoframe_io::FormatOptions;
//!
//! # fn main() -> duoframe_frame::Result<()> {
//! let loader = Loader::new();
//! let sales = loader.load_frame("sales.csv", Engine::Columnar, None, &FormatOptions::new())?;
//! let more = loader.load_member("archive.zip", "sales_q2.csv", Engine::Legacy, None, &FormatOptions::new())?;
//! let all: Frame = sales.append(&more)?;
//! println!("{:?}", all.shape());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod frame;
pub mod loader;
pub mod provenance;
pub mod timeseries;

pub use error::{Error, ErrorKind, Result};
pub use frame::Frame;
pub use loader::Loader;
pub use provenance::{FileMetadata, Provenance};
pub use timeseries::TimeSeries;
