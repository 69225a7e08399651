//! Show subcommand for layerconf
//!
//! Prints the merged configuration as a plain nested mapping.

use crate::config::RuntimeConfig;
use crate::format::OutputFormat;
use anyhow::Result;
use clap::Args;

/// Arguments for the show subcommand
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Prefix prepended to every key, at every nesting level
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Render the flattened configuration.
pub fn run(runtime: &RuntimeConfig, args: &ShowArgs) -> Result<String> {
    let flat = runtime.flatten(args.prefix.as_deref());
    args.format.render(&flat)
}
