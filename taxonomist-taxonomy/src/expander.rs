//! Reconstructing taxonomy trees from the remote link graph
//!
//! Expansion proceeds one level at a time. Child lookups for every node on
//! the current level run concurrently, bounded by the configured concurrency,
//! and results are attached in the order the remote store returned them.

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::query::{child_summary, TaxonomyQuery, CHILD_FIELDS};
use crate::tree::{NodeId, TaxonNode, TaxonomyTree};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use taxonomist_core::{ContentId, TaxonSummary};
use taxonomist_publishing::{PublishingApi, PARENT_TAXONS};
use tracing::debug;

/// Default bound on concurrent child lookups per level
pub const DEFAULT_CONCURRENCY: usize = 8;

/// A taxon with its immediate children only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedTaxonomy {
    tree: TaxonomyTree,
}

impl ExpandedTaxonomy {
    pub fn taxon(&self) -> &TaxonNode {
        self.tree.root_node()
    }

    pub fn children(&self) -> Vec<&TaxonNode> {
        self.tree
            .children(self.tree.root())
            .iter()
            .map(|id| self.tree.node(*id))
            .collect()
    }

    pub fn has_children(&self) -> bool {
        !self.tree.root_node().is_leaf()
    }

    pub fn into_tree(self) -> TaxonomyTree {
        self.tree
    }
}

#[derive(Clone)]
pub struct TaxonomyTreeExpander {
    api: Arc<dyn PublishingApi>,
    concurrency: usize,
}

impl TaxonomyTreeExpander {
    pub fn new(api: Arc<dyn PublishingApi>) -> Self {
        Self::with_concurrency(api, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(api: Arc<dyn PublishingApi>, concurrency: usize) -> Self {
        Self {
            api,
            concurrency: concurrency.max(1),
        }
    }

    /// The full tree beneath `root`
    pub async fn expand(&self, root: &ContentId) -> TaxonomyResult<TaxonomyTree> {
        self.expand_to_depth(root, None).await
    }

    /// `root` and its direct children
    pub async fn expand_shallow(&self, root: &ContentId) -> TaxonomyResult<ExpandedTaxonomy> {
        let tree = self.expand_to_depth(root, Some(1)).await?;
        Ok(ExpandedTaxonomy { tree })
    }

    /// The tree beneath `root`, stopping after `max_depth` levels when given
    pub async fn expand_to_depth(
        &self,
        root: &ContentId,
        max_depth: Option<usize>,
    ) -> TaxonomyResult<TaxonomyTree> {
        let content = self
            .api
            .get_content(root)
            .await
            .map_err(|e| TaxonomyError::from_lookup(root, e))?;
        let mut tree = TaxonomyTree::new(TaxonSummary::new(
            content.content_id,
            content.title,
            content.base_path,
        ));

        let mut visited = HashSet::from([tree.root_node().content_id().clone()]);
        let mut frontier = vec![tree.root()];
        let mut depth = 0;

        while !frontier.is_empty() && max_depth.map_or(true, |max| depth < max) {
            debug!("Expanding level {} of {} ({} nodes)", depth + 1, root, frontier.len());

            let lookups: Vec<(NodeId, ContentId)> = frontier
                .iter()
                .map(|id| (*id, tree.node(*id).content_id().clone()))
                .collect();
            let api = &self.api;

            let levels: Vec<_> = stream::iter(lookups)
                .map(|(node, content_id)| async move {
                    let children = api
                        .get_linked_items(&content_id, PARENT_TAXONS, &CHILD_FIELDS)
                        .await;
                    (node, content_id, children)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

            let mut next = Vec::new();
            for (node, content_id, children) in levels {
                for item in children? {
                    let child = child_summary(&content_id, item)?;
                    if !visited.insert(child.content_id.clone()) {
                        return Err(TaxonomyError::MalformedTaxonomy {
                            content_id: child.content_id,
                            reason: format!("reached twice while expanding {}", root),
                        });
                    }
                    next.push(tree.add_child(node, child));
                }
            }

            frontier = next;
            depth += 1;
        }

        Ok(tree)
    }

    /// Chain from the top-level ancestor down to `content_id`
    pub async fn expand_ancestors(&self, content_id: &ContentId) -> TaxonomyResult<TaxonomyTree> {
        let query = TaxonomyQuery::new(self.api.clone());
        let (content, ancestors) = tokio::try_join!(
            async {
                self.api
                    .get_content(content_id)
                    .await
                    .map_err(|e| TaxonomyError::from_lookup(content_id, e))
            },
            query.ancestors(content_id)
        )?;

        let mut chain = ancestors.iter().map(|t| t.summary());
        let leaf = TaxonSummary::new(content.content_id, content.title, content.base_path);
        let mut tree = match chain.next() {
            Some(top) => TaxonomyTree::new(top),
            None => return Ok(TaxonomyTree::new(leaf)),
        };

        let mut tip = tree.root();
        for summary in chain {
            tip = tree.add_child(tip, summary);
        }
        tree.add_child(tip, leaf);
        Ok(tree)
    }
}
