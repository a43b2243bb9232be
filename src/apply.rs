//! Patch pipelines: read a patch, pick the document, merge, encode, write.
//!
//! These are the library-level operations behind the `config patch`,
//! `genesis patch`, and `patch` subcommands.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::document::DocumentFormat;
use crate::errors::{PatchError, PatchResult};
use crate::home;
use crate::merge::merge_patch;
use crate::output::{self, OutputDestination};
use crate::target::{self, ConfigTarget};

/// Read the patch text from a file, or from stdin when no file is given.
/// The result is trimmed; an empty result means "nothing to do".
pub fn read_patch_source(file: Option<&Path>) -> PatchResult<String> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| PatchError::io(format!("reading patch file {}", path.display()), e))?,
        None => io::read_to_string(io::stdin())
            .map_err(|e| PatchError::io("reading patch from stdin", e))?,
    };
    Ok(raw.trim().to_string())
}

/// Merge-patch a document given as text, returning the re-encoded text.
pub fn patch_document_text(
    original: &str,
    patch: &str,
    format: DocumentFormat,
) -> PatchResult<String> {
    let patch = format.decode_table("patch", patch)?;
    let original = format.decode_table("target", original)?;
    let merged = merge_patch(&Value::Object(original), &Value::Object(patch));
    format.encode("patched target", &merged)
}

/// Apply a TOML merge-patch to one of the node config files.
///
/// When `explicit` is `None` the target is auto-detected from the patch's
/// top-level keys. Returns the path of the file that was patched.
pub fn apply_config_patch(
    home: &Path,
    explicit: Option<ConfigTarget>,
    patch_text: &str,
    dest: &OutputDestination,
) -> PatchResult<PathBuf> {
    let patch = DocumentFormat::Toml.decode_table("patch", patch_text)?;
    let target = match explicit {
        Some(target) => target,
        None => target::detect_target(&patch)?,
    };
    debug!("patching {target} config");

    let path = home::config_file(home, target);
    let original_text = fs::read_to_string(&path)
        .map_err(|e| PatchError::io(format!("reading config file {}", path.display()), e))?;
    let original = DocumentFormat::Toml.decode_table("config", &original_text)?;

    let merged = merge_patch(&Value::Object(original), &Value::Object(patch));
    let encoded = DocumentFormat::Toml.encode("patched config", &merged)?;
    output::write(dest, &path, &encoded)?;
    Ok(path)
}

/// Apply a JSON merge-patch to the genesis file. Returns its path.
pub fn apply_genesis_patch(
    home: &Path,
    patch_text: &str,
    dest: &OutputDestination,
) -> PatchResult<PathBuf> {
    let patch = DocumentFormat::Json.decode_table("patch", patch_text)?;

    let path = home::genesis_file(home);
    let original_text = fs::read_to_string(&path)
        .map_err(|e| PatchError::io(format!("reading genesis file {}", path.display()), e))?;
    let original = DocumentFormat::Json.decode_table("genesis", &original_text)?;

    let merged = merge_patch(&Value::Object(original), &Value::Object(patch));
    let encoded = DocumentFormat::Json.encode("patched genesis", &merged)?;
    output::write(dest, &path, &encoded)?;
    Ok(path)
}

/// Apply a merge-patch to an arbitrary TOML or JSON file; the target's
/// extension selects the codec for both the patch and the document.
pub fn apply_file_patch(
    target: &Path,
    patch_text: &str,
    dest: &OutputDestination,
) -> PatchResult<()> {
    let format = DocumentFormat::from_path(target)?;
    let original_text = fs::read_to_string(target)
        .map_err(|e| PatchError::io(format!("reading target file {}", target.display()), e))?;
    let patched = patch_document_text(&original_text, patch_text, format)?;
    output::write(dest, target, &patched)
}
