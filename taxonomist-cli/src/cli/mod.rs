pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taxonomist",
    version,
    about = "Curate a taxonomy held by a publishing API",
    long_about = "Taxonomist inspects, publishes and unpublishes taxons held by a remote \
                  publishing API, keeps a local log of every change made to them, and moves \
                  tagged content onto a parent taxon when a taxon is retired."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to $TAXONOMIST_HOME/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "TAXONOMIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect, publish and retire taxons
    Taxon(commands::taxon::TaxonArgs),

    /// Browse the local version log
    Versions(commands::versions::VersionsArgs),

    /// Show or create the configuration file
    Config(commands::config::ConfigArgs),
}
