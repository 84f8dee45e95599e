//! Zip-member materialization.
//!
//! The whole archive is extracted into a fresh `tempfile::TempDir`, then the
//! requested member is checked against the archive's entry list. The returned
//! `ArchiveMember` owns the directory: dropping it deletes everything that was
//! extracted, on success and on every error path.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

const TEMP_PREFIX: &str = "duoframe-zip-";

/// Extracted archive member. Keep it alive for as long as `path()` is in use.
#[derive(Debug)]
pub struct ArchiveMember {
    dir: TempDir,
    path: PathBuf,
    member: String,
    archive: PathBuf,
}

impl ArchiveMember {
    /// Path of the extracted member inside the temp directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The temp directory holding the whole extracted archive.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Delete the temp directory now, reporting any removal error.
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

/// Entry names of a zip archive, in archive order.
pub fn list_members(archive: &Path) -> Result<Vec<String>> {
    let zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    Ok((0..zip.len())
        .filter_map(|i| zip.name_for_index(i).map(str::to_string))
        .collect())
}

/// Extract `archive` and return a scoped handle to `member`.
///
/// `temp_root` selects the parent of the temp directory (OS default when
/// `None`). Fails with `MemberNotFound` when `member` is not an entry name.
pub fn open_member(archive: &Path, member: &str, temp_root: Option<&Path>) -> Result<ArchiveMember> {
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    let dir = match temp_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };

    zip.extract(dir.path())?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        archive = %archive.display(),
        entries = zip.len(),
        dir = %dir.path().display(),
        "extracted archive"
    );

    if !zip.file_names().any(|name| name == member) {
        // `dir` drops here and takes the extracted files with it.
        return Err(Error::MemberNotFound {
            member: member.to_string(),
            archive: archive.to_path_buf(),
        });
    }

    let path = dir.path().join(member);
    Ok(ArchiveMember {
        dir,
        path,
        member: member.to_string(),
        archive: archive.to_path_buf(),
    })
}

/// Run `f` on the extracted member's path, then release the temp directory.
///
/// The directory outlives the whole call to `f` and is removed whatever `f`
/// returns.
pub fn with_member<T, E>(
    archive: &Path,
    member: &str,
    temp_root: Option<&Path>,
    f: impl FnOnce(&Path) -> std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<Error>,
{
    let handle = open_member(archive, member, temp_root)?;
    let out = f(handle.path());
    drop(handle);
    out
}
