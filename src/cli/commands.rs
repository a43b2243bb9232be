use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::apply;
use crate::cli::args::{AwaitCommands, Cli, Commands, ConfigCommands, GenesisCommands, OutputArgs};
use crate::home;
use crate::readiness::{self, PollSettings};
use crate::target::ConfigTarget;

pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Config { target, command }) => match command {
            ConfigCommands::Patch { file, out } => {
                _config_patch(cli.home.as_deref(), *target, file.as_deref(), out)
            }
        },
        Some(Commands::Genesis { command }) => match command {
            GenesisCommands::Patch { file, out } => {
                _genesis_patch(cli.home.as_deref(), file.as_deref(), out)
            }
        },
        Some(Commands::Patch { target, file, out }) => _patch(target, file.as_deref(), out),
        Some(Commands::Await { timeout, command }) => match command {
            AwaitCommands::Validator { address, api } => {
                _await_validator(cli.home.as_deref(), *timeout, address, api.as_deref())
            }
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

#[instrument(skip(out))]
fn _config_patch(
    home: Option<&Path>,
    target: Option<ConfigTarget>,
    file: Option<&Path>,
    out: &OutputArgs,
) -> Result<()> {
    let patch_text = apply::read_patch_source(file)?;
    if patch_text.is_empty() {
        debug!("empty patch, nothing to do");
        return Ok(());
    }
    let home = home::resolve(home)?;
    let path = apply::apply_config_patch(&home, target, &patch_text, &out.destination())?;
    debug!("patched {}", path.display());
    Ok(())
}

#[instrument(skip(out))]
fn _genesis_patch(home: Option<&Path>, file: Option<&Path>, out: &OutputArgs) -> Result<()> {
    let patch_text = apply::read_patch_source(file)?;
    if patch_text.is_empty() {
        debug!("empty patch, nothing to do");
        return Ok(());
    }
    let home = home::resolve(home)?;
    let path = apply::apply_genesis_patch(&home, &patch_text, &out.destination())?;
    debug!("patched {}", path.display());
    Ok(())
}

#[instrument(skip(out))]
fn _patch(target: &Path, file: Option<&Path>, out: &OutputArgs) -> Result<()> {
    let patch_text = apply::read_patch_source(file)?;
    if patch_text.is_empty() {
        debug!("empty patch, nothing to do");
        return Ok(());
    }
    apply::apply_file_patch(target, &patch_text, &out.destination())?;
    Ok(())
}

#[instrument]
fn _await_validator(
    home: Option<&Path>,
    timeout_secs: u64,
    address: &str,
    api: Option<&str>,
) -> Result<()> {
    let home = home::resolve(home)?;
    let api_url = readiness::resolve_api_url(api, &home)?;
    debug!("awaiting validator {address} via {api_url}");
    let settings = PollSettings {
        timeout: Duration::from_secs(timeout_secs),
        ..PollSettings::default()
    };
    readiness::await_validator(&api_url, address, &settings)?;
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
