//! Runtime configuration with environment overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::Result;

pub const ENV_ENGINE: &str = "DUOFRAME_ENGINE";
pub const ENV_TEMP_DIR: &str = "DUOFRAME_TEMP_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Engine used when a caller does not name one.
    pub default_engine: Engine,
    /// Parent directory for archive extraction; the OS temp dir when `None`.
    pub temp_root: Option<PathBuf>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            default_engine: Engine::Columnar,
            temp_root: None,
        }
    }
}

impl FrameConfig {
    /// Defaults overlaid with `DUOFRAME_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(engine) = lookup(ENV_ENGINE) {
            cfg.default_engine = engine.parse()?;
        }
        if let Some(dir) = lookup(ENV_TEMP_DIR) {
            if !dir.is_empty() {
                cfg.temp_root = Some(PathBuf::from(dir));
            }
        }
        Ok(cfg)
    }
}
