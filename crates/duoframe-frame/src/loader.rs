//! Loader: resolve a reader, read to columnar, convert to the requested engine.
//!
//! - Reader choice follows `duoframe_io::resolve` (hint, then suffix, then csv).
//! - Options reach the reader exactly as given.
//! - Archive members are extracted into a scoped temp dir that is gone before
//!   `load_member` returns, whatever the outcome.

use std::path::Path;

use duoframe_core::config::FrameConfig;
use duoframe_core::{Dataset, Engine};
use duoframe_io::{resolve_reader, with_member, FormatOptions, ReaderRegistry};

use crate::error::Result;
use crate::frame::Frame;
use crate::provenance::Provenance;

/// Owns the reader registry and runtime config.
pub struct Loader {
    readers: ReaderRegistry,
    config: FrameConfig,
}

impl Loader {
    /// Built-in readers, default config.
    pub fn new() -> Self {
        Self {
            readers: ReaderRegistry::new(),
            config: FrameConfig::default(),
        }
    }

    /// Built-in readers, config from `DUOFRAME_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new().with_config(FrameConfig::from_env()?))
    }

    pub fn with_registry(mut self, readers: ReaderRegistry) -> Self {
        self.readers = readers;
        self
    }

    pub fn with_config(mut self, config: FrameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn readers(&self) -> &ReaderRegistry {
        &self.readers
    }

    pub fn readers_mut(&mut self) -> &mut ReaderRegistry {
        &mut self.readers
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Read `path` into `engine`.
    ///
    /// Readers produce columnar data; `Engine::Legacy` costs one conversion.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        engine: Engine,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<Dataset> {
        let path = path.as_ref();
        let reader = resolve_reader(&self.readers, path, hint)?;
        let batch = (reader.func)(path, options)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %path.display(),
            reader = %reader.name,
            rows = batch.num_rows(),
            cols = batch.num_columns(),
            "loaded"
        );

        let data = Dataset::Columnar(batch);
        if engine == Engine::Columnar {
            return Ok(data);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(from = %data.engine(), to = %engine, "engine conversion");

        Ok(data.into_engine(engine)?)
    }

    /// Like `load`, with the engine given by name. The name is parsed before
    /// the path is touched.
    pub fn load_named(
        &self,
        path: impl AsRef<Path>,
        engine: &str,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<Dataset> {
        let engine: Engine = engine.parse()?;
        self.load(path, engine, hint, options)
    }

    /// `load` wrapped in a `Frame` that remembers its source file.
    pub fn load_frame(
        &self,
        path: impl AsRef<Path>,
        engine: Engine,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<Frame> {
        let path = path.as_ref();
        let data = self.load(path, engine, hint, options)?;
        Ok(Frame::with_provenance(data, Provenance::File(path.to_path_buf())))
    }

    /// `load_frame` in the configured default engine.
    pub fn load_default(
        &self,
        path: impl AsRef<Path>,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<Frame> {
        self.load_frame(path, self.config.default_engine, hint, options)
    }

    /// Load one member of a zip archive.
    ///
    /// The reader is resolved from the member's own suffix. The extraction
    /// directory lives under `config.temp_root` (OS temp dir when unset).
    pub fn load_member(
        &self,
        archive: impl AsRef<Path>,
        member: &str,
        engine: Engine,
        hint: Option<&str>,
        options: &FormatOptions,
    ) -> Result<Frame> {
        let archive = archive.as_ref();
        let temp_root = self.config.temp_root.as_deref();
        let data = with_member(archive, member, temp_root, |path| {
            self.load(path, engine, hint, options)
        })?;
        Ok(Frame::with_provenance(
            data,
            Provenance::Archive {
                archive: archive.to_path_buf(),
                member: member.to_string(),
            },
        ))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
