//! Command implementations for tether.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the shared configuration assembly every command
//! starts from: config file, then ambient environment, then CLI flags,
//! highest precedence last.

mod plan;
mod stage;
mod usage;

use crate::cli::{Cli, Command};
use crate::config::{AdapterConfig, DEFAULT_CONFIG_FILE};
use crate::context::AdapterContext;
use crate::error::{Result, TetherError};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let ctx = AdapterContext::new(cli.output_dir);

    match cli.command {
        Command::Stage => stage::cmd_stage(&config, &ctx),
        Command::Plan(args) => plan::cmd_plan(&config, &ctx, &args.instruction),
        Command::Usage => usage::cmd_usage(&ctx),
    }
}

/// Assemble the effective configuration for this invocation.
///
/// An explicitly passed `--config` file must exist; the default
/// `tether.yaml` is optional.
fn build_config(cli: &Cli) -> Result<AdapterConfig> {
    let mut config = match &cli.config {
        Some(path) => AdapterConfig::load(path)?.ok_or_else(|| {
            TetherError::UserError(format!("config file '{}' does not exist", path.display()))
        })?,
        None => AdapterConfig::load(DEFAULT_CONFIG_FILE)?.unwrap_or_default(),
    };

    config.apply_ambient_env();
    config.apply_overrides(cli.model.clone(), cli.binary_path.clone(), &cli.env)?;
    config.validate()?;

    Ok(config)
}
