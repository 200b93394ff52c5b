use std::path::Path;

use clap::Parser;

use super::{Command, TesterArgs};

#[test]
fn run_takes_a_config_path() -> Result<(), String> {
    let args = TesterArgs::try_parse_from(["hookload", "run", "--config", "test.yaml"])
        .map_err(|err| format!("parse failed: {}", err))?;
    match args.command {
        Command::Run { config } => {
            assert_eq!(config, Path::new("test.yaml"));
            Ok(())
        }
        Command::Create { .. } => Err("expected the run command".to_owned()),
    }
}

#[test]
fn create_defaults_its_output_path() -> Result<(), String> {
    let args = TesterArgs::try_parse_from(["hookload", "create"])
        .map_err(|err| format!("parse failed: {}", err))?;
    match args.command {
        Command::Create { config } => {
            assert_eq!(config, Path::new("hookload.yaml"));
            Ok(())
        }
        Command::Run { .. } => Err("expected the create command".to_owned()),
    }
}

#[test]
fn global_flags_parse_after_the_subcommand() -> Result<(), String> {
    let args = TesterArgs::try_parse_from(["hookload", "run", "-c", "t.yaml", "-v", "--no-color"])
        .map_err(|err| format!("parse failed: {}", err))?;
    assert!(args.verbose);
    assert!(args.no_color);
    Ok(())
}

#[test]
fn run_without_a_config_is_rejected() {
    // SAFETY: no other test reads or writes this variable.
    unsafe { std::env::remove_var("HOOKLOAD_CONFIG") };
    let parsed = TesterArgs::try_parse_from(["hookload", "run"]);
    assert!(parsed.is_err());
}
