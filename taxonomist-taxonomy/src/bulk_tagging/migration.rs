//! Tag migrations: batches of content moved from one taxon to others

use crate::error::{TaxonomyError, TaxonomyResult};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use taxonomist_core::ContentId;
use taxonomist_publishing::TAXONS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingState {
    ReadyToTag,
    Tagged,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Ready,
    Queued,
    Completed,
}

/// One content item to be tagged to one taxon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    pub content_base_path: String,
    pub content_id: Option<ContentId>,
    #[serde(default)]
    pub link_title: Option<String>,
    pub link_content_id: ContentId,
    pub link_type: String,
    pub state: MappingState,
    pub messages: Vec<String>,
    pub publish_requested_at: Option<DateTime<Utc>>,
    pub publish_completed_at: Option<DateTime<Utc>>,
}

impl TagMapping {
    pub fn new(content_base_path: impl Into<String>, link_content_id: ContentId) -> Self {
        Self {
            content_base_path: content_base_path.into(),
            content_id: None,
            link_title: None,
            link_content_id,
            link_type: TAXONS.to_string(),
            state: MappingState::ReadyToTag,
            messages: Vec::new(),
            publish_requested_at: None,
            publish_completed_at: None,
        }
    }

    pub fn with_link_title(mut self, title: impl Into<String>) -> Self {
        self.link_title = Some(title.into());
        self
    }

    pub fn with_link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = link_type.into();
        self
    }

    /// Whether publication was requested and has completed since
    pub fn publish_confirmed(&self) -> bool {
        match (self.publish_requested_at, self.publish_completed_at) {
            (Some(requested), Some(completed)) => requested <= completed,
            _ => false,
        }
    }

    pub fn mark_requested(&mut self, at: DateTime<Utc>) {
        self.publish_requested_at = Some(at);
    }

    pub fn mark_tagged(&mut self, content_id: ContentId, at: DateTime<Utc>) {
        self.content_id = Some(content_id);
        self.state = MappingState::Tagged;
        self.publish_completed_at = Some(at);
    }

    pub fn mark_errored(&mut self, message: impl Into<String>) {
        self.state = MappingState::Errored;
        self.messages.push(message.into());
    }

    pub fn is_settled(&self) -> bool {
        self.state != MappingState::ReadyToTag
    }
}

/// Tags content items to target taxons
///
/// With a `source_content_id`, every content item tagged to that taxon is
/// moved onto the targets. Imported migrations have no source and only add
/// links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMigration {
    pub id: Uuid,
    pub source_content_id: Option<ContentId>,
    pub taxon_content_ids: Vec<ContentId>,
    pub mappings: Vec<TagMapping>,
    pub created_at: DateTime<Utc>,
    pub state: MigrationState,
    pub requested_by: Option<String>,
}

impl TagMigration {
    /// Distinct content base paths, in mapping order
    pub fn content_base_paths(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .map(|m| m.content_base_path.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn count_in(&self, state: MappingState) -> usize {
        self.mappings.iter().filter(|m| m.state == state).count()
    }

    pub fn is_complete(&self) -> bool {
        self.state == MigrationState::Completed
    }
}

/// Builds a [`TagMigration`] with one mapping per content item and target taxon
pub struct BuildTagMigration;

impl BuildTagMigration {
    pub fn call(
        source_content_id: &ContentId,
        taxon_content_ids: &[ContentId],
        content_base_paths: &[String],
    ) -> TaxonomyResult<TagMigration> {
        let base_paths: IndexSet<&str> = content_base_paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if base_paths.is_empty() {
            return Err(TaxonomyError::EmptyMigration(source_content_id.clone()));
        }

        let targets: IndexSet<&ContentId> = taxon_content_ids
            .iter()
            .filter(|id| *id != source_content_id)
            .collect();
        if targets.is_empty() {
            return Err(TaxonomyError::Queue(format!(
                "no target taxons to migrate {} to",
                source_content_id
            )));
        }

        let mappings = base_paths
            .iter()
            .flat_map(|path| targets.iter().map(move |id| TagMapping::new(*path, (*id).clone())))
            .collect();

        Ok(TagMigration {
            id: Uuid::new_v4(),
            source_content_id: Some(source_content_id.clone()),
            taxon_content_ids: targets.into_iter().cloned().collect(),
            mappings,
            created_at: Utc::now(),
            state: MigrationState::Ready,
            requested_by: None,
        })
    }

    /// Wrap mappings read from a spreadsheet into a source-less migration
    pub fn from_import(mappings: Vec<TagMapping>) -> TaxonomyResult<TagMigration> {
        if mappings.is_empty() {
            return Err(TaxonomyError::Import("the spreadsheet has no tag mappings".to_string()));
        }

        let taxon_content_ids: IndexSet<ContentId> =
            mappings.iter().map(|m| m.link_content_id.clone()).collect();

        Ok(TagMigration {
            id: Uuid::new_v4(),
            source_content_id: None,
            taxon_content_ids: taxon_content_ids.into_iter().collect(),
            mappings,
            created_at: Utc::now(),
            state: MigrationState::Ready,
            requested_by: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_one_mapping_per_path_and_taxon() {
        let migration = BuildTagMigration::call(
            &ContentId::from("source"),
            &[ContentId::from("t1"), ContentId::from("t2")],
            &["/a".to_string(), "/b".to_string(), "/a".to_string()],
        )
        .unwrap();

        assert_eq!(migration.mappings.len(), 4);
        assert_eq!(migration.content_base_paths(), vec!["/a", "/b"]);
        assert_eq!(migration.count_in(MappingState::ReadyToTag), 4);
        assert!(migration.mappings.iter().all(|m| m.link_type == "taxons"));
    }

    #[test]
    fn test_empty_migration_rejected() {
        let err = BuildTagMigration::call(&ContentId::from("s"), &[ContentId::from("t")], &[]);
        assert!(matches!(err, Err(TaxonomyError::EmptyMigration(_))));
    }

    #[test]
    fn test_source_is_not_a_target() {
        let err = BuildTagMigration::call(
            &ContentId::from("s"),
            &[ContentId::from("s")],
            &["/a".to_string()],
        );
        assert!(matches!(err, Err(TaxonomyError::Queue(_))));
    }

    #[test]
    fn test_import_collects_distinct_targets() {
        let migration = BuildTagMigration::from_import(vec![
            TagMapping::new("/a", ContentId::from("t1")).with_link_title("Tourism"),
            TagMapping::new("/b", ContentId::from("t1")),
            TagMapping::new("/b", ContentId::from("o1")).with_link_type("organisations"),
        ])
        .unwrap();

        assert!(migration.source_content_id.is_none());
        assert_eq!(
            migration.taxon_content_ids,
            vec![ContentId::from("t1"), ContentId::from("o1")]
        );
        assert_eq!(migration.content_base_paths(), vec!["/a", "/b"]);
        assert_eq!(migration.mappings[0].link_title.as_deref(), Some("Tourism"));
    }

    #[test]
    fn test_empty_import_rejected() {
        let err = BuildTagMigration::from_import(Vec::new());
        assert!(matches!(err, Err(TaxonomyError::Import(_))));
    }

    #[test]
    fn test_publish_confirmed() {
        let now = Utc::now();
        let mut mapping = TagMapping::new("/a", ContentId::from("t"));
        assert!(!mapping.publish_confirmed());

        mapping.mark_requested(now);
        assert!(!mapping.publish_confirmed());

        mapping.mark_tagged(ContentId::from("c"), now);
        assert!(mapping.publish_confirmed());

        mapping.publish_completed_at = Some(now - Duration::seconds(5));
        assert!(!mapping.publish_confirmed());
    }
}
