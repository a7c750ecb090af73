//! Command dispatch and handlers.

pub mod apply;
pub mod labels;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::{Config, CONFIG_ENV};
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// `-C <DIR>` is applied first, so relative config paths and every file
/// pattern resolve against that directory. When `--config` is absent,
/// `LINECITE_CONFIG` names the config file.
///
/// # Errors
///
/// Returns an error string if the directory change, config loading, or the
/// selected command fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    if let Some(dir) = &cli.dir {
        env::set_current_dir(dir)
            .map_err(|e| format!("Failed to change directory to {}: {e}", dir.display()))?;
    }

    let config_path = cli.config.clone().or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    let ctx = ServiceContext::live();
    let config = Config::load(&ctx, config_path.as_deref()).map_err(|e| e.to_string())?;

    dispatch_with_context(&cli.command(), &ctx, &config)
}

/// Dispatch a command with the given service context and configuration.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Apply { dry_run } => apply::run(ctx, config, *dry_run),
        Command::Labels { json } => labels::run(ctx, config, *json),
    }
}
