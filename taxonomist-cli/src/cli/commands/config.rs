use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use taxonomist_core::system::describe_paths;
use taxonomist_core::{load_or_default, save_config, taxonomist_config_path, Config, TaxonomistError};

use crate::cli::output::{section_header, success};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show(ShowConfigArgs),

    /// Write a configuration file with default values
    Init(InitConfigArgs),
}

#[derive(Args)]
pub struct ShowConfigArgs {
    /// Print the bearer token instead of masking it
    #[arg(long)]
    pub show_token: bool,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the file (defaults to --config, then $TAXONOMIST_HOME/config.toml)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommand::Show(args) => show(args, config_path),
        ConfigCommand::Init(args) => init(args, config_path),
    }
}

fn show(args: ShowConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_or_default(config_path)?;
    if !args.show_token {
        config.publishing_api.bearer_token = mask(&config.publishing_api.bearer_token);
    }

    println!("{}", toml::to_string_pretty(&config)?);
    section_header("Paths");
    println!("{}", describe_paths());
    println!("  Version log: {}", config.versions_database_path().display());
    Ok(())
}

fn init(args: InitConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let path = args
        .path
        .or_else(|| config_path.map(Path::to_path_buf))
        .unwrap_or_else(taxonomist_config_path);

    if path.exists() && !args.force {
        return Err(TaxonomistError::Configuration(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }

    save_config(&path, &Config::default())?;
    success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

fn mask(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let visible: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), visible)
}
