//! layerconf
//!
//! Layers configuration files over the built-in defaults and prints or
//! queries the merged tree.

use anyhow::Result;
use clap::Parser;
use layerconf::cli::{Cli, Command, build_runtime, get, show};
use layerconf::logging::{LogTarget, init_logging};
use std::io::Write;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let runtime = build_runtime(&cli.config, cli.overwrite)?;
    debug!(?runtime, "Configuration loaded");

    let output = match cli.command.unwrap_or(Command::Show(show::ShowArgs::default())) {
        Command::Show(args) => show::run(&runtime, &args)?,
        Command::Get(args) => get::run(&runtime, &args)?,
        Command::Check => {
            info!(files = cli.config.len(), "Configuration applied");
            format!("ok: {} file(s) applied\n", cli.config.len())
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
