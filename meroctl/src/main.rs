//! This is a command-line tool to register and browse specimen samples via [libmero]
use crate::{cli::*, config::*};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use libmero::store::SampleStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod output;
mod prompt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("MEROCTL_LOG"))
        .with_writer(std::io::stderr)
        .init();
    let args = Cli::parse();
    let config_file = match args.config {
        Some(path) => path,
        None => config_file()?,
    };
    let cfg = Config::load_or_default(&config_file).await?;
    debug!(?config_file, ?cfg, "loaded configuration");

    match args.command {
        Commands::Config { save } => {
            println!("# {}", config_file.display());
            println!("{}", cfg.format()?);
            if save {
                cfg.save_to_file(&config_file).await?;
                println!("Saved configuration to {}", config_file.display());
            }
            Ok(())
        }
        Commands::Login => {
            println!("Authentication is not supported. Every session is anonymous and in-memory.");
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
            Ok(())
        }
        command => {
            let mut store = match cfg.seed {
                true => SampleStore::seeded(),
                false => SampleStore::new(),
            };
            debug!(samples = store.len(), "starting with a new sample store");
            commands::samples::handle_command(command, &mut store, &cfg)
        }
    }
}
