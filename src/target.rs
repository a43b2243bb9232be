//! Config-target selection: which of the node's TOML files a patch applies to.

use std::fmt;

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::errors::{PatchError, PatchResult};

/// One of the three node configuration files under `<home>/config/`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTarget {
    /// Application config (`app.toml`)
    App,
    /// Client config (`client.toml`)
    Client,
    /// Consensus/node config (`config.toml`)
    Config,
}

impl ConfigTarget {
    pub fn name(self) -> &'static str {
        match self {
            ConfigTarget::App => "app",
            ConfigTarget::Client => "client",
            ConfigTarget::Config => "config",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ConfigTarget::App => "app.toml",
            ConfigTarget::Client => "client.toml",
            ConfigTarget::Config => "config.toml",
        }
    }
}

impl fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a top-level key or section header to the config file it belongs to.
fn hint_for(key: &str) -> Option<ConfigTarget> {
    use ConfigTarget::*;
    Some(match key {
        // app.toml top-level keys
        "minimum-gas-prices" | "pruning" | "pruning-keep-recent" | "pruning-interval"
        | "min-retain-blocks" | "halt-height" | "halt-time" | "inter-block-cache"
        | "index-events" | "iavl-cache-size" | "iavl-disable-fastnode" | "app-db-backend" => App,

        // app.toml section headers
        "telemetry" | "api" | "rosetta" | "grpc" | "grpc-web" | "state-sync" | "streaming"
        | "iavl" | "wasm" => App,

        // config.toml top-level keys
        "proxy-app" | "moniker" | "mode" | "db-backend" | "db-dir" | "log-level"
        | "log-format" | "genesis-file" | "node-key-file" | "abci" | "filter-peers" => Config,

        // config.toml section headers
        "rpc" | "p2p" | "mempool" | "statesync" | "blocksync" | "consensus" | "tx-index"
        | "instrumentation" | "priv-validator" => Config,

        // client.toml top-level keys
        "chain-id" | "keyring-backend" | "output" | "node" | "broadcast-mode" => Client,

        _ => return None,
    })
}

/// Detect which config file a patch applies to from its top-level keys.
///
/// Keys without a hint are skipped: they ride along with whatever target the
/// known keys select. Hints for two different targets are an error, since
/// silently picking one could write settings into the wrong file.
pub fn detect_target(patch: &Map<String, Value>) -> PatchResult<ConfigTarget> {
    let mut detected: Option<ConfigTarget> = None;
    for key in patch.keys() {
        let Some(hint) = hint_for(key) else {
            continue;
        };
        match detected {
            None => detected = Some(hint),
            Some(current) if current != hint => {
                return Err(PatchError::AmbiguousTarget {
                    first: current,
                    second: hint,
                });
            }
            Some(_) => {}
        }
    }
    detected.ok_or(PatchError::TargetNotDetected)
}
