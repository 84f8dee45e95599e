//! Format resolution: explicit hint first, then the path suffix.
//!
//! Rules (same for readers and writers):
//! - a hint must name a registered entry exactly, otherwise `UnsupportedFormat`;
//! - `.xls` / `.xlsx` map to the `excel` entry;
//! - any other suffix maps to the entry named after it (dot stripped, case kept);
//! - an unregistered or missing suffix falls back to `csv`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::registry::{ReadFn, ReaderRegistry, WriteFn, WriterRegistry, CSV, EXCEL};

const EXCEL_SUFFIXES: [&str; 2] = [".xls", ".xlsx"];

/// A looked-up reader or writer together with the name it was found under.
#[derive(Debug, Clone)]
pub struct Resolved<F> {
    pub name: String,
    pub func: F,
}

/// Suffix of the file name including the leading dot, case preserved.
pub fn suffix(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

pub fn resolve_reader(
    registry: &ReaderRegistry,
    path: &Path,
    hint: Option<&str>,
) -> Result<Resolved<ReadFn>> {
    let name = resolve_name(path, hint, |n| registry.contains(n));
    let func = registry
        .get(&name)
        .ok_or_else(|| Error::UnsupportedFormat(name.clone()))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), reader = %name, hinted = hint.is_some(), "resolved reader");

    Ok(Resolved { name, func })
}

pub fn resolve_writer(
    registry: &WriterRegistry,
    path: &Path,
    hint: Option<&str>,
) -> Result<Resolved<WriteFn>> {
    let name = resolve_name(path, hint, |n| registry.contains(n));
    let func = registry
        .get(&name)
        .ok_or_else(|| Error::UnsupportedFormat(name.clone()))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), writer = %name, hinted = hint.is_some(), "resolved writer");

    Ok(Resolved { name, func })
}

/// Name of the entry to look up. A hint is returned verbatim (the lookup then
/// fails if it is not registered); suffix-derived names that are not
/// registered become `csv`.
fn resolve_name(path: &Path, hint: Option<&str>, contains: impl Fn(&str) -> bool) -> String {
    if let Some(hint) = hint {
        return hint.to_string();
    }

    let Some(sfx) = suffix(path) else {
        return CSV.to_string();
    };
    if EXCEL_SUFFIXES.contains(&sfx.as_str()) {
        return EXCEL.to_string();
    }
    let bare = &sfx[1..];
    if contains(bare) {
        bare.to_string()
    } else {
        CSV.to_string()
    }
}
