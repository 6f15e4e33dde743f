//! Persistence policy
//!
//! Decides, per artifact, whether it is skipped, only planned (dry-run) or
//! written, and records failures without aborting the run.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::result::GenerationResult;
use crate::error::EntityGenError;

/// Filesystem operations the generator needs.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem. Files are replaced atomically: contents go to a
/// temporary file in the target directory which is then renamed over the
/// destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = new_temp_file(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.flush()?;
        // A replaced file keeps its mode.
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Temporary file created with the mode a plain file creation would get
/// (`0o666` less the umask), not the owner-only default of `tempfile`.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Overwrite and dry-run switches of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    pub overwrite: bool,
    pub dry_run: bool,
}

/// Persist one artifact under `policy`.
///
/// Returns `true` when the artifact counts as generated: written, or
/// planned in dry-run mode. Skips and failures are recorded in `result`.
pub fn persist<F: Filesystem + ?Sized>(
    filesystem: &F,
    policy: WritePolicy,
    directory: &Path,
    file: &Path,
    contents: &str,
    result: &mut GenerationResult,
) -> bool {
    if !policy.overwrite && filesystem.exists(file) {
        warn!(file = %file.display(), "File exists, skipping");
        result.skipped.push(file.to_path_buf());
        return false;
    }

    if policy.dry_run {
        debug!(file = %file.display(), "Dry-run, not writing");
        return true;
    }

    if let Err(source) = filesystem.create_dir_all(directory) {
        result.errors.push(EntityGenError::DirectoryCreate {
            path: directory.to_path_buf(),
            source,
        });
        return false;
    }

    if let Err(source) = filesystem.write_file(file, contents) {
        result.errors.push(EntityGenError::FileWrite {
            path: file.to_path_buf(),
            source,
        });
        return false;
    }

    debug!(file = %file.display(), bytes = contents.len(), "Wrote file");
    true
}
