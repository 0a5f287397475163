//! Bulk retagging of content between taxons
//!
//! A [`TagMigration`] lists content items (by base path) to move from a
//! source taxon onto one or more target taxons. Migrations are handed to a
//! [`MigrationQueue`]; the [`PublishingQueue`] publishes them in the
//! background and records the outcome of every mapping.
//!
//! Mappings can also be read from a spreadsheet with [`TagImporter`]; those
//! migrations have no source taxon and only add links.

pub mod import;
pub mod migration;
pub mod queue;

pub use import::{parse_tag_mappings, TagImporter, DOWNLOAD_PROBLEM};
pub use migration::{BuildTagMigration, MappingState, MigrationState, TagMapping, TagMigration};
pub use queue::{replace_taxon, MigrationQueue, PublishingQueue};

#[cfg(test)]
pub use queue::MockMigrationQueue;
