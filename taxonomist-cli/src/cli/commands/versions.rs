use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use comfy_table::Cell;
use std::path::Path;
use taxonomist_core::{load_or_default, ContentId, TaxonomistError};
use taxonomist_taxonomy::VersionStore;

use crate::cli::context::open_versions;
use crate::cli::output::{
    change_line, create_standard_table, empty, header_cell, json, section_header, tree_section,
};

#[derive(Args)]
pub struct VersionsArgs {
    #[command(subcommand)]
    pub command: VersionsCommand,
}

#[derive(Subcommand)]
pub enum VersionsCommand {
    /// List the recorded versions of a taxon
    List(ListVersionsArgs),

    /// Show the changes recorded in one version
    Show(ShowVersionArgs),
}

#[derive(Args)]
pub struct ListVersionsArgs {
    /// Content id of the taxon
    pub content_id: ContentId,

    /// Print the versions as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowVersionArgs {
    /// Content id of the taxon
    pub content_id: ContentId,

    /// Version number (starting at 1)
    pub number: u32,

    /// Print the version as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: VersionsArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_or_default(config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let store = open_versions(&config).await?;
        match args.command {
            VersionsCommand::List(args) => {
                let versions = store.versions(&args.content_id).await?;
                if args.json {
                    return json(&versions);
                }
                if versions.is_empty() {
                    empty(&format!("No versions recorded for {}", args.content_id));
                    return Ok(());
                }

                let mut table = create_standard_table();
                table.set_header(vec![
                    header_cell("Version"),
                    header_cell("Created"),
                    header_cell("Changes"),
                    header_cell("Note"),
                ]);
                for version in &versions {
                    table.add_row(vec![
                        Cell::new(version.number),
                        Cell::new(version.created_at.format("%Y-%m-%d %H:%M:%S")),
                        Cell::new(version.object_changes.len()),
                        Cell::new(&version.note),
                    ]);
                }
                println!("{}", table);
                Ok(())
            }
            VersionsCommand::Show(args) => {
                let version = store
                    .version(&args.content_id, args.number)
                    .await?
                    .ok_or_else(|| {
                        TaxonomistError::NotFound(format!(
                            "version {} of {}",
                            args.number, args.content_id
                        ))
                    })?;
                if args.json {
                    return json(&version);
                }

                section_header(&format!("Version {} of {}", version.number, version.content_id));
                tree_section(&[
                    ("Created", version.created_at.to_rfc3339()),
                    ("Note", version.note.clone()),
                ]);

                if version.object_changes.is_empty() {
                    empty("No field changes");
                } else {
                    println!();
                    for change in &version.object_changes {
                        println!("  {}", change_line(change));
                    }
                }
                if version.is_first() {
                    println!("\n{}", "First recorded version".dimmed());
                }
                Ok(())
            }
        }
    })
}
