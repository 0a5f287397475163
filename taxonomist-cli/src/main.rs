use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use taxonomist_core::TaxonomistError;
use taxonomist_publishing::PublishingApiError;
use taxonomist_taxonomy::TaxonomyError;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then TAXONOMIST_LOG, then the -v count
    let log_level = std::env::var("TAXONOMIST_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Taxon(args) => crate::cli::commands::taxon::run(args, config_path),
        Commands::Versions(args) => crate::cli::commands::versions::run(args, config_path),
        Commands::Config(args) => crate::cli::commands::config::run(args, config_path),
    }
}

/// Map error kinds onto process exit codes
fn exit_code(e: &anyhow::Error) -> i32 {
    if let Some(err) = e.downcast_ref::<TaxonomistError>() {
        return match err {
            TaxonomistError::Configuration(_) => 2,
            TaxonomistError::Io(_) => 3,
            TaxonomistError::NotFound(_) => 4,
            _ => 1,
        };
    }
    if let Some(err) = e.downcast_ref::<TaxonomyError>() {
        return match err {
            TaxonomyError::TaxonNotFound(_) => 4,
            TaxonomyError::Api(api) if api.is_not_found() => 4,
            TaxonomyError::Api(_) => 5,
            _ => 1,
        };
    }
    match e.downcast_ref::<PublishingApiError>() {
        Some(err) if err.is_not_found() => 4,
        Some(_) => 5,
        None => 1,
    }
}
