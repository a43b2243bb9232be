//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::output::OutputDestination;
use crate::target::ConfigTarget;

/// Configuration utility for Cosmos-style node deployments
#[derive(Parser, Debug)]
#[command(name = "nodectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Node home directory (default: ~/.node)
    #[arg(long, global = true, env = "NODECTL_HOME", value_hint = ValueHint::DirPath)]
    pub home: Option<PathBuf>,

    /// Enable debug logging (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage node TOML configuration files
    Config {
        /// Target config file (auto-detected from patch keys when omitted)
        #[arg(short, long, value_enum)]
        target: Option<ConfigTarget>,

        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage the genesis JSON file
    Genesis {
        #[command(subcommand)]
        command: GenesisCommands,
    },

    /// Apply a merge-patch to any TOML or JSON file
    Patch {
        /// File to patch; the extension selects the format
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        target: PathBuf,

        /// Patch file (stdin when omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Wait for a condition to become true on the node API
    Await {
        /// Maximum time to wait, in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        #[command(subcommand)]
        command: AwaitCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Apply a merge-patch to a node config file
    Patch {
        /// Patch file (stdin when omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum GenesisCommands {
    /// Apply a merge-patch to the genesis file
    Patch {
        /// Patch file (stdin when omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum AwaitCommands {
    /// Wait until a validator address is present on chain
    Validator {
        /// Validator operator address
        address: String,

        /// Node HTTP API URL (default: from app.toml, else http://localhost:1317)
        #[arg(long)]
        api: Option<String>,
    },
}

/// Where to write the patched file. Defaults to stdout.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Write the result to this file
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite the patched file in place
    #[arg(short = 'i', long = "in-place")]
    pub in_place: bool,
}

impl OutputArgs {
    pub fn destination(&self) -> OutputDestination {
        if self.in_place {
            OutputDestination::InPlace
        } else if let Some(path) = &self.output {
            OutputDestination::File(path.clone())
        } else {
            OutputDestination::Stdout
        }
    }
}
