//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(
    name = "hookload",
    version,
    about = "Load tester for webhook-based APIs: fires correlated requests and measures end-to-end callback latency."
)]
pub struct TesterArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in log output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a load test from a config file.
    Run {
        /// Path to the test config (.yaml, .yml, or .json).
        #[arg(short, long, env = "HOOKLOAD_CONFIG")]
        config: PathBuf,
    },
    /// Write a starter config file to get going.
    Create {
        /// Where to write the starter config.
        #[arg(short, long, default_value = "hookload.yaml")]
        config: PathBuf,
    },
}
