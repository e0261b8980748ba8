use anyhow::Result;
use clap::Parser;
use framegate::app::{RunOverrides, list_transforms_command, run_demo_command};
use framegate::cli::{Cli, Commands};
use framegate::config::Config;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        None => {
            // No subcommand: run the default demo.
            let config = load_config(cli.config.as_deref())?;
            run_demo_command(config, RunOverrides::default(), cli.quiet)?;
        }
        Some(Commands::Run {
            transform,
            duration,
            fps,
            queue_capacity,
            size,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let overrides = RunOverrides {
                transform,
                duration_secs: duration,
                fps,
                queue_capacity,
                size,
            };
            run_demo_command(config, overrides, cli.quiet)?;
        }
        Some(Commands::Transforms) => {
            list_transforms_command();
        }
    }
    Ok(())
}

fn init_logging(quiet: bool, verbose: u8) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}
