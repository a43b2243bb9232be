use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::target::ConfigTarget;

/// Errors from the patching pipeline: codecs, target detection, and file I/O.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("unsupported target file extension: {0} (must be .toml or .json)")]
    UnsupportedExtension(String),

    #[error("patch applies to at least two target configurations ({first}, {second}); set --target explicitly or patch one configuration at a time")]
    AmbiguousTarget {
        first: ConfigTarget,
        second: ConfigTarget,
    },

    #[error("configuration target could not be detected; set --target explicitly")]
    TargetNotDetected,

    #[error("failed to determine user home directory")]
    HomeNotFound,

    #[error("parsing {context} as TOML: {source}")]
    TomlDecode {
        context: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("parsing {context} as JSON: {source}")]
    JsonDecode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing {context} as JSON: top-level value must be an object")]
    NonObjectRoot { context: String },

    #[error("encoding {context} as TOML: {source}")]
    TomlEncode {
        context: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("encoding {context} as JSON: {source}")]
    JsonEncode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PatchError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type PatchResult<T> = Result<T, PatchError>;

/// Errors from the readiness polling loop and API URL resolution.
#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("parsing API URL {value:?}: {reason}")]
    InvalidApiUrl { value: String, reason: String },

    #[error("reading {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validator not available after {0:?} timeout")]
    Timeout(Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type ReadinessResult<T> = Result<T, ReadinessError>;
