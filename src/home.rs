//! Node home directory resolution and config file layout.
//!
//! Precedence: `--home` flag, `NODECTL_HOME` (merged into the flag by clap),
//! then `~/.node`.

use std::path::{Path, PathBuf};

use directories::UserDirs;

use crate::errors::{PatchError, PatchResult};
use crate::target::ConfigTarget;

/// Directory under the user's home used when `--home` is not given.
pub const DEFAULT_HOME_DIR: &str = ".node";

pub fn resolve(flag: Option<&Path>) -> PatchResult<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    let dirs = UserDirs::new().ok_or(PatchError::HomeNotFound)?;
    Ok(dirs.home_dir().join(DEFAULT_HOME_DIR))
}

pub fn config_dir(home: &Path) -> PathBuf {
    home.join("config")
}

pub fn config_file(home: &Path, target: ConfigTarget) -> PathBuf {
    config_dir(home).join(target.file_name())
}

pub fn genesis_file(home: &Path) -> PathBuf {
    config_dir(home).join("genesis.json")
}

pub fn app_config_file(home: &Path) -> PathBuf {
    config_file(home, ConfigTarget::App)
}
