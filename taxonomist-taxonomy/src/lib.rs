//! Taxonomy services for Taxonomist
//!
//! Everything here works against a [`PublishingApi`] handed in as
//! `Arc<dyn PublishingApi>`; the only local state is the version log and the
//! tag migration queue.
//!
//! - [`TaxonBuilder`] assembles a taxon from its content item and links
//! - [`TaxonDiffEngine`] computes field-level changes between snapshots
//! - [`TaxonVersioner`] appends those changes to a [`VersionStore`]
//! - [`TaxonomyTreeExpander`] rebuilds the tree beneath (or above) a taxon
//! - [`TaxonomyQuery`] answers parent, ancestor and child questions
//! - [`TaxonUnpublisher`] retags content to the parent, then redirects
//! - [`TaxonPublisher`] sends new and edited taxons to the publishing API
//! - [`TagImporter`] reads tag mappings from a spreadsheet
//! - [`RootTaxons`] lists and replaces the taxonomy's top-level taxons
//!
//! [`PublishingApi`]: taxonomist_publishing::PublishingApi

pub mod builder;
pub mod bulk_tagging;
pub mod diff;
pub mod error;
pub mod expander;
pub mod links;
pub mod presenter;
pub mod publisher;
pub mod query;
pub mod remote_taxons;
pub mod root_taxons;
pub mod tree;
pub mod unpublisher;
pub mod version_store;
pub mod versioner;

pub use builder::TaxonBuilder;
pub use bulk_tagging::{
    BuildTagMigration, MappingState, MigrationQueue, MigrationState, PublishingQueue, TagImporter,
    TagMapping, TagMigration,
};
pub use diff::TaxonDiffEngine;
pub use error::{TaxonomyError, TaxonomyResult};
pub use expander::{ExpandedTaxonomy, TaxonomyTreeExpander};
pub use links::{ContentItemExpandedLinks, TAG_TYPES};
pub use presenter::TaxonPresenter;
pub use publisher::{PublishOutcome, TaxonPublisher};
pub use query::TaxonomyQuery;
pub use remote_taxons::{RemoteTaxons, TaxonSearchResults};
pub use root_taxons::RootTaxons;
pub use tree::{NestedTaxon, NodeId, TaxonNode, TaxonomyTree};
pub use unpublisher::{RetagOutcome, TaxonUnpublisher, UnpublishOutcome};
pub use version_store::{InMemoryVersionStore, SqliteVersionStore, VersionStore};
pub use versioner::TaxonVersioner;
