//! Output destinations for patched documents.
//!
//! Rewrites go through a temp file in the destination directory, fsync, and
//! rename, so a crash mid-write never leaves a truncated config behind.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{PatchError, PatchResult};

/// Mode for files created via `--output`.
const OUTPUT_FILE_MODE: u32 = 0o600;

/// Where a patched document goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputDestination {
    /// Print to standard output.
    #[default]
    Stdout,
    /// Write to the given path.
    File(PathBuf),
    /// Atomically replace the file that was patched.
    InPlace,
}

/// Write patched content to its destination.
///
/// `original_path` is the file that was patched; it is only consulted for
/// the in-place case, where its permission bits carry over to the rewrite.
pub fn write(dest: &OutputDestination, original_path: &Path, content: &str) -> PatchResult<()> {
    match dest {
        OutputDestination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .map_err(|e| PatchError::io("writing to stdout", e))
        }
        OutputDestination::File(path) => {
            write_file_atomically(path, content.as_bytes(), fs::Permissions::from_mode(OUTPUT_FILE_MODE))
        }
        OutputDestination::InPlace => {
            let metadata = fs::metadata(original_path).map_err(|e| {
                PatchError::io(format!("reading metadata of {}", original_path.display()), e)
            })?;
            write_file_atomically(original_path, content.as_bytes(), metadata.permissions())
        }
    }
}

/// Atomically write `content` at `destination`: temp file in the same
/// directory, write, fsync, chmod, rename.
pub fn write_file_atomically(
    destination: &Path,
    content: &[u8],
    permissions: fs::Permissions,
) -> PatchResult<()> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(dir)
        .map_err(|e| PatchError::io(format!("creating temporary file in {}", dir.display()), e))?;

    tmp.write_all(content)
        .map_err(|e| PatchError::io("writing temporary file", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PatchError::io("syncing temporary file", e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| PatchError::io("setting temporary file permissions", e))?;

    tmp.persist(destination).map_err(|e| {
        PatchError::io(format!("replacing {}", destination.display()), e.error)
    })?;
    debug!("wrote {}", destination.display());
    Ok(())
}
