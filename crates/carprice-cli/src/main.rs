//! Carprice CLI - command-line front-end for the car price estimator.
//!
//! Logs go to stderr so stdout carries only the form and the estimates.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use carprice_cli::{load_predictor, Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("carprice=info".parse()?))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::ExportDemo(cmd) => cmd.run()?,
        Commands::Check(cmd) => cmd.run(&cli.artifact_config()?)?,
        Commands::Predict(cmd) => {
            let predictor = load_predictor(&cli.artifact_config()?)?;
            cmd.run(&predictor)?
        }
        Commands::Form(cmd) => {
            let predictor = load_predictor(&cli.artifact_config()?)?;
            cmd.run(&predictor)?
        }
    }

    info!("Carprice CLI completed successfully");
    Ok(())
}
