//! Get subcommand for layerconf
//!
//! Resolves a dotted path attribute by attribute and prints the value.

use crate::config::RuntimeConfig;
use crate::format::OutputFormat;
use anyhow::Result;
use clap::Args;

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted path to the value, e.g. `server.port`
    pub key: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Render the value at `args.key`. Nested sections are flattened.
pub fn run(runtime: &RuntimeConfig, args: &GetArgs) -> Result<String> {
    let value = runtime.conf().resolve(&args.key)?;
    args.format.render(&value.to_json())
}
