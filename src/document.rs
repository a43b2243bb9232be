//! Text ⇄ tree codec for the two supported document formats.
//!
//! Both patches and target documents are decoded into the same untyped tree
//! (`serde_json::Value`) so the merge engine works identically for TOML and
//! JSON files.

use std::ffi::OsStr;
use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{PatchError, PatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Select the format from a file's extension (case-insensitive).
    pub fn from_path(path: &Path) -> PatchResult<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(DocumentFormat::Toml),
            Some("json") => Ok(DocumentFormat::Json),
            other => Err(PatchError::UnsupportedExtension(
                other.map(|ext| format!(".{ext}")).unwrap_or_default(),
            )),
        }
    }

    /// Decode text into a top-level table. Non-object JSON roots are
    /// rejected; TOML documents are tables by construction.
    pub fn decode_table(self, context: &str, text: &str) -> PatchResult<Map<String, Value>> {
        match self {
            DocumentFormat::Toml => {
                let table: toml::Table = text.parse().map_err(|source| PatchError::TomlDecode {
                    context: context.to_string(),
                    source,
                })?;
                Ok(table
                    .into_iter()
                    .map(|(key, value)| (key, toml_to_tree(value)))
                    .collect())
            }
            DocumentFormat::Json => {
                let value: Value =
                    serde_json::from_str(text).map_err(|source| PatchError::JsonDecode {
                        context: context.to_string(),
                        source,
                    })?;
                match value {
                    Value::Object(map) => Ok(map),
                    _ => Err(PatchError::NonObjectRoot {
                        context: context.to_string(),
                    }),
                }
            }
        }
    }

    /// Encode a tree back to text in this format.
    pub fn encode(self, context: &str, tree: &Value) -> PatchResult<String> {
        match self {
            DocumentFormat::Toml => {
                toml::to_string(tree).map_err(|source| PatchError::TomlEncode {
                    context: context.to_string(),
                    source,
                })
            }
            DocumentFormat::Json => {
                let mut text = serde_json::to_string_pretty(tree).map_err(|source| {
                    PatchError::JsonEncode {
                        context: context.to_string(),
                        source,
                    }
                })?;
                text.push('\n');
                Ok(text)
            }
        }
    }
}

/// Convert a TOML value into the untyped tree.
///
/// Datetimes are carried as strings; non-finite floats have no JSON
/// representation and become null.
fn toml_to_tree(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_tree).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_tree(value)))
                .collect(),
        ),
    }
}
