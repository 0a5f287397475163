use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use comfy_table::Cell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taxonomist_core::{ContentId, Taxon, TaxonDraft};
use taxonomist_taxonomy::{
    BuildTagMigration, ContentItemExpandedLinks, MappingState, MigrationQueue, PublishingQueue,
    RemoteTaxons, RetagOutcome, TagImporter, TagMigration, TaxonPublisher, TaxonUnpublisher,
};

use crate::cli::context::AppContext;
use crate::cli::output::{
    action, create_standard_table, empty, header_cell, info, json, render_taxonomy,
    section_header, success, tree_item, tree_section, warning,
};

#[derive(Args)]
pub struct TaxonArgs {
    #[command(subcommand)]
    pub command: TaxonCommand,
}

#[derive(Subcommand)]
pub enum TaxonCommand {
    /// Show a taxon, the content tagged to it and the tree beneath it
    Show(ShowArgs),

    /// Print the taxonomy tree rooted at a taxon
    Tree(TreeArgs),

    /// Print the breadcrumb trail from the top-level taxon
    Ancestors(IdArgs),

    /// Show what deleting a taxon would affect
    ConfirmDelete(IdArgs),

    /// Publish a taxon from a JSON draft
    Publish(PublishArgs),

    /// Unpublish a taxon, redirecting it to another taxon
    Unpublish(UnpublishArgs),

    /// Unpublish a taxon as gone and record its removal
    Delete(DeleteArgs),

    /// Show the expanded links of a content item by tag type
    Links(IdArgs),

    /// List taxons held by the publishing API
    List(ListArgs),

    /// List or replace the top-level taxons
    Roots(RootsArgs),

    /// Tag content from a spreadsheet published as CSV
    Import(ImportArgs),
}

#[derive(Args)]
pub struct IdArgs {
    /// Content id of the taxon
    pub content_id: ContentId,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Content id of the taxon
    pub content_id: ContentId,

    /// Print the taxon as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Content id of the root taxon
    pub content_id: ContentId,

    /// Stop expanding below this many levels
    #[arg(long)]
    pub depth: Option<usize>,

    /// Print the tree as nested JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PublishArgs {
    /// JSON file holding the taxon draft
    pub file: PathBuf,

    /// Note recorded with the version
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Args)]
pub struct UnpublishArgs {
    /// Content id of the taxon to unpublish
    pub content_id: ContentId,

    /// Taxon to redirect to
    #[arg(long, value_name = "CONTENT_ID")]
    pub redirect_to: ContentId,

    /// Name recorded against the retag migration
    #[arg(long)]
    pub user: String,

    /// Leave tagged content where it is
    #[arg(long)]
    pub no_retag: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Content id of the taxon to delete
    pub content_id: ContentId,

    /// Note recorded with the removal
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub per_page: Option<u32>,

    /// Filter by title
    #[arg(short, long)]
    pub query: Option<String>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RootsArgs {
    #[command(subcommand)]
    pub command: RootsCommand,
}

#[derive(Subcommand)]
pub enum RootsCommand {
    /// Show the current top-level taxons
    List {
        /// Print the taxons as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the top-level taxons, in the order given
    Set {
        #[arg(required = true, value_name = "CONTENT_ID")]
        content_ids: Vec<ContentId>,
    },
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV export URL of the spreadsheet
    pub url: String,

    /// Name recorded against the migration
    #[arg(long)]
    pub user: String,

    /// Only show the mappings that would be published
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: TaxonArgs, config_path: Option<&Path>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        match args.command {
            TaxonCommand::Show(args) => show(&ctx, args).await,
            TaxonCommand::Tree(args) => tree(&ctx, args).await,
            TaxonCommand::Ancestors(args) => ancestors(&ctx, args).await,
            TaxonCommand::ConfirmDelete(args) => confirm_delete(&ctx, args).await,
            TaxonCommand::Publish(args) => publish(&ctx, args).await,
            TaxonCommand::Unpublish(args) => unpublish(&ctx, args).await,
            TaxonCommand::Delete(args) => delete(&ctx, args).await,
            TaxonCommand::Links(args) => links(&ctx, args).await,
            TaxonCommand::List(args) => list(&ctx, args).await,
            TaxonCommand::Roots(args) => roots(&ctx, args).await,
            TaxonCommand::Import(args) => import(&ctx, args).await,
        }
    })
}

async fn show(ctx: &AppContext, args: ShowArgs) -> Result<()> {
    let taxon = ctx.builder().build(&args.content_id).await?;
    if args.json {
        return json(&taxon);
    }

    let tagged = ctx
        .query()
        .tagged_content(&args.content_id, &["base_path"])
        .await?;
    let tree = ctx.expander().expand(&args.content_id).await?;

    section_header(&taxon.title);
    tree_section(&taxon_fields(&taxon, tagged.len()));

    section_header("Taxonomy");
    render_taxonomy(&tree);
    for (_, base_path) in tree.duplicate_sibling_paths() {
        warning(&format!("More than one child taxon uses {}", base_path));
    }
    Ok(())
}

fn taxon_fields(taxon: &Taxon, tagged: usize) -> Vec<(&'static str, String)> {
    let parent = taxon
        .parent_content_id
        .as_ref()
        .map(ContentId::to_string)
        .unwrap_or_else(|| "none".to_string());
    let associated = taxon
        .associated_taxons
        .as_ref()
        .map(|ids| ids.len())
        .unwrap_or(0);

    vec![
        ("Content ID", taxon.content_id.to_string()),
        ("Base path", taxon.base_path.clone()),
        ("Internal name", taxon.internal_name.clone()),
        ("Description", taxon.description.clone()),
        ("Phase", taxon.phase.clone()),
        (
            "State",
            taxon.publication_state.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        ("Parent", parent),
        ("Associated taxons", associated.to_string()),
        ("Tagged content", tagged.to_string()),
    ]
}

async fn tree(ctx: &AppContext, args: TreeArgs) -> Result<()> {
    let tree = ctx
        .expander()
        .expand_to_depth(&args.content_id, args.depth)
        .await?;

    if args.json {
        return json(&tree.to_nested());
    }

    render_taxonomy(&tree);
    println!(
        "\n{} taxons, {} levels deep",
        tree.len(),
        tree.max_depth() + 1
    );
    Ok(())
}

async fn ancestors(ctx: &AppContext, args: IdArgs) -> Result<()> {
    let tree = ctx.expander().expand_ancestors(&args.content_id).await?;
    let leaf = tree
        .find(&args.content_id)
        .unwrap_or_else(|| tree.root());

    let trail: Vec<String> = tree
        .breadcrumb_trail(leaf)
        .into_iter()
        .map(|id| tree.node(id).title().to_string())
        .collect();
    let separator = " › ".dimmed().to_string();
    println!("{}", trail.join(separator.as_str()));
    Ok(())
}

async fn confirm_delete(ctx: &AppContext, args: IdArgs) -> Result<()> {
    let expander = ctx.expander();
    let query = ctx.query();
    let (expanded, tagged) = tokio::try_join!(
        expander.expand_shallow(&args.content_id),
        query.tagged_content(&args.content_id, &["title", "base_path"])
    )?;

    let taxon = expanded.taxon();
    section_header(&format!("Deleting {} ({})", taxon.title(), taxon.base_path()));

    if expanded.has_children() {
        let children = expanded.children();
        warning(&format!(
            "This taxon has {} child taxon(s) which will be left without a parent",
            children.len()
        ));
        for (i, child) in children.iter().enumerate() {
            tree_item(i == children.len() - 1, child.title(), Some(child.base_path()));
        }
    } else {
        info("No child taxons");
    }

    if tagged.is_empty() {
        empty("No content is tagged to this taxon");
    } else {
        warning(&format!("{} content item(s) are tagged to this taxon", tagged.len()));
        for (i, item) in tagged.iter().enumerate() {
            tree_item(
                i == tagged.len() - 1,
                item.title.as_deref().unwrap_or("(untitled)"),
                item.base_path.as_deref(),
            );
        }
    }
    Ok(())
}

async fn publish(ctx: &AppContext, args: PublishArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let draft: TaxonDraft = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid taxon draft", args.file.display()))?;
    let taxon = draft.into_taxon();

    action(&format!("Publishing {} to {}", taxon.title, taxon.base_path));
    let publisher = TaxonPublisher::new(
        ctx.api.clone(),
        ctx.versioner().await?,
        ctx.config.publishing.clone(),
    );
    let outcome = publisher.publish(&taxon, &args.note).await?;

    let verb = if outcome.created { "Created" } else { "Updated" };
    success(&format!("{} taxon {}", verb, taxon.content_id));
    match outcome.version {
        Some(version) => info(&format!(
            "Recorded version {} with {} change(s)",
            version.number,
            version.object_changes.len()
        )),
        None => empty("Nothing changed; no version recorded"),
    }
    Ok(())
}

async fn unpublish(ctx: &AppContext, args: UnpublishArgs) -> Result<()> {
    let queue = Arc::new(PublishingQueue::start(ctx.api.clone()));
    let unpublisher = TaxonUnpublisher::new(ctx.api.clone(), queue.clone());

    let result = unpublisher
        .unpublish(&args.content_id, &args.redirect_to, &args.user, !args.no_retag)
        .await;
    // Let queued retagging finish before the runtime goes away
    queue.shutdown().await?;
    let outcome = result?;

    success(&format!(
        "Unpublished {} with a redirect to {}",
        args.content_id, outcome.redirect_path
    ));

    match outcome.retag {
        RetagOutcome::Skipped => empty("Tagged content was left in place"),
        RetagOutcome::NoParent => warning("The taxon has no parent; tagged content was not moved"),
        RetagOutcome::Failed(reason) => warning(&format!("Tagged content was not moved: {}", reason)),
        RetagOutcome::Queued {
            migration_id,
            parent,
            content_count,
        } => {
            info(&format!(
                "Moved {} content item(s) to parent {}",
                content_count, parent
            ));
            if let Some(migration) = queue.status(&migration_id) {
                let errored = migration.count_in(MappingState::Errored);
                if errored > 0 {
                    warning(&format!("{} item(s) could not be retagged", errored));
                    for mapping in migration
                        .mappings
                        .iter()
                        .filter(|m| m.state == MappingState::Errored)
                    {
                        println!(
                            "  {} {}",
                            mapping.content_base_path,
                            mapping.messages.join("; ").dimmed()
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

async fn delete(ctx: &AppContext, args: DeleteArgs) -> Result<()> {
    let previous = ctx.builder().build(&args.content_id).await?;
    let versioner = ctx.versioner().await?;

    let queue = Arc::new(PublishingQueue::start(ctx.api.clone()));
    let status = TaxonUnpublisher::new(ctx.api.clone(), queue.clone())
        .unpublish_gone(&args.content_id)
        .await;
    queue.shutdown().await?;
    let status = status?;

    success(&format!("Deleted {} ({})", previous.title, status));
    if let Some(version) = versioner.save_removal(&previous, &args.note).await? {
        info(&format!("Recorded removal as version {}", version.number));
    }
    Ok(())
}

async fn links(ctx: &AppContext, args: IdArgs) -> Result<()> {
    let links = ContentItemExpandedLinks::find(ctx.api.as_ref(), &args.content_id).await?;

    for (tag_type, items) in links.iter() {
        section_header(tag_type);
        if items.is_empty() {
            empty("none");
            continue;
        }
        for (i, item) in items.iter().enumerate() {
            tree_item(
                i == items.len() - 1,
                item.title.as_deref().unwrap_or("(untitled)"),
                item.base_path.as_deref(),
            );
        }
    }
    println!("\nLink set version {}", links.previous_version);
    Ok(())
}

async fn list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let results = RemoteTaxons::new(ctx.api.clone())
        .search(args.page, args.per_page, args.query.as_deref())
        .await?;

    if args.json {
        return json(&results.taxons);
    }
    if results.taxons.is_empty() {
        empty("No taxons found");
        return Ok(());
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Title"),
        header_cell("Base path"),
        header_cell("Content ID"),
    ]);
    for taxon in &results.taxons {
        table.add_row(vec![
            Cell::new(&taxon.title),
            Cell::new(&taxon.base_path),
            Cell::new(taxon.content_id.as_str()),
        ]);
    }
    println!("{}", table);
    println!(
        "Page {} of {} ({} taxons)",
        results.current_page, results.pages, results.total
    );
    Ok(())
}

async fn roots(ctx: &AppContext, args: RootsArgs) -> Result<()> {
    let roots = ctx.root_taxons();
    match args.command {
        RootsCommand::List { json: as_json } => {
            let taxons = roots.list().await?;
            if as_json {
                return json(&taxons);
            }
            if taxons.is_empty() {
                empty("No root taxons");
                return Ok(());
            }
            section_header("Root taxons");
            for (i, taxon) in taxons.iter().enumerate() {
                tree_item(i == taxons.len() - 1, &taxon.title, Some(taxon.base_path.as_str()));
            }
        }
        RootsCommand::Set { content_ids } => {
            let set = roots.set(&content_ids).await?;
            success(&format!("Set {} root taxon(s)", set.len()));
        }
    }
    Ok(())
}

async fn import(ctx: &AppContext, args: ImportArgs) -> Result<()> {
    let importer = TagImporter::new(ctx.config.publishing_api.timeout())?;
    let migration = BuildTagMigration::from_import(importer.fetch(&args.url).await?)?;

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Content"),
        header_cell("Link"),
        header_cell("Link type"),
    ]);
    for mapping in &migration.mappings {
        let link = match &mapping.link_title {
            Some(title) => format!("{} ({})", title, mapping.link_content_id),
            None => mapping.link_content_id.to_string(),
        };
        table.add_row(vec![
            Cell::new(&mapping.content_base_path),
            Cell::new(link),
            Cell::new(&mapping.link_type),
        ]);
    }
    println!("{}", table);

    if args.dry_run {
        info(&format!(
            "{} mapping(s) for {} content item(s); nothing published",
            migration.mappings.len(),
            migration.content_base_paths().len()
        ));
        return Ok(());
    }

    let queue = PublishingQueue::start(ctx.api.clone());
    let queued = queue.enqueue(migration, &args.user).await;
    queue.shutdown().await?;
    let id = queued?;

    if let Some(done) = queue.status(&id) {
        report_import(&done);
    }
    Ok(())
}

fn report_import(migration: &TagMigration) {
    success(&format!(
        "Tagged {} mapping(s)",
        migration.count_in(MappingState::Tagged)
    ));
    let errored: Vec<_> = migration
        .mappings
        .iter()
        .filter(|m| m.state == MappingState::Errored)
        .collect();
    if errored.is_empty() {
        return;
    }
    warning(&format!("{} mapping(s) could not be tagged", errored.len()));
    for mapping in errored {
        println!(
            "  {} {}",
            mapping.content_base_path,
            mapping.messages.join("; ").dimmed()
        );
    }
}
