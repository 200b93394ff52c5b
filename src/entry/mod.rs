//! Process entry: argument parsing, logging setup, and command dispatch.

use std::path::Path;

use clap::Parser;

use crate::args::{Command, TesterArgs};
use crate::config;
use crate::error::AppResult;
use crate::session::{self, DefaultTester};
use crate::system::logger;

/// Parses the command line and runs the selected command to completion.
///
/// # Errors
///
/// Returns the first fatal error from the selected command; a timed-out run
/// is reported in the output, not returned as an error.
pub fn run() -> AppResult<()> {
    let args = TesterArgs::parse();
    logger::init_logging(args.verbose, args.no_color);

    match args.command {
        Command::Create { config } => create_config(&config),
        Command::Run { config } => run_test(&config),
    }
}

fn create_config(path: &Path) -> AppResult<()> {
    config::write_starter_config(path)?;
    println!("Starter config written to {}", path.display());
    println!("Edit it, then start a run with: hookload run --config {}", path.display());
    Ok(())
}

fn run_test(path: &Path) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let mut tester = DefaultTester::new();
        session::execute(&mut tester, path).await?;
        Ok(())
    })
}
