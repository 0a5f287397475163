//! Arena-backed taxonomy tree
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. The root is
//! always at index 0; parents are back-references by index, so there is no
//! reference cycle to manage.

use serde::Serialize;
use std::collections::HashMap;
use taxonomist_core::{ContentId, TaxonSummary};

/// Index of a node within its [`TaxonomyTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonNode {
    pub taxon: TaxonSummary,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TaxonNode {
    pub fn content_id(&self) -> &ContentId {
        &self.taxon.content_id
    }

    pub fn title(&self) -> &str {
        &self.taxon.title
    }

    pub fn base_path(&self) -> &str {
        &self.taxon.base_path
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyTree {
    nodes: Vec<TaxonNode>,
}

impl TaxonomyTree {
    pub fn new(root: TaxonSummary) -> Self {
        Self {
            nodes: vec![TaxonNode {
                taxon: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> &TaxonNode {
        &self.nodes[0]
    }

    /// Attach `taxon` as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not handed out by this tree. The tree is left
    /// unchanged in that case.
    pub fn add_child(&mut self, parent: NodeId, taxon: TaxonSummary) -> NodeId {
        assert!(
            parent.0 < self.nodes.len(),
            "parent {:?} does not belong to this tree",
            parent
        );
        let id = NodeId(self.nodes.len());
        self.nodes[parent.0].children.push(id);
        self.nodes.push(TaxonNode {
            taxon,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TaxonNode> {
        self.nodes.get(id.0)
    }

    /// Node for an id handed out by this tree
    ///
    /// # Panics
    ///
    /// Panics on an id from another tree; use [`TaxonomyTree::get`] when the
    /// id's origin is not known.
    pub fn node(&self, id: NodeId) -> &TaxonNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in depth-first pre-order, root first
    pub fn tree(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Every node except the root, in depth-first pre-order
    pub fn descendants(&self) -> Vec<NodeId> {
        self.tree().into_iter().skip(1).collect()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors
    }

    /// Path from the root down to `id`, inclusive
    pub fn breadcrumb_trail(&self, id: NodeId) -> Vec<NodeId> {
        let mut trail = self.ancestors(id);
        trail.reverse();
        trail.push(id);
        trail
    }

    /// Number of edges between the root and `id`
    pub fn node_depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Deepest level present in the tree
    pub fn max_depth(&self) -> usize {
        self.tree()
            .into_iter()
            .map(|id| self.node_depth(id))
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, content_id: &ContentId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| &n.taxon.content_id == content_id)
            .map(NodeId)
    }

    /// Base paths shared by more than one child of the same parent
    pub fn duplicate_sibling_paths(&self) -> Vec<(NodeId, String)> {
        let mut duplicates = Vec::new();
        for id in self.tree() {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for child in self.children(id) {
                *seen.entry(self.node(*child).base_path()).or_default() += 1;
            }
            let mut shared: Vec<String> = seen
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(path, _)| path.to_string())
                .collect();
            shared.sort();
            duplicates.extend(shared.into_iter().map(|path| (id, path)));
        }
        duplicates
    }

    /// Nested, serializable view of the tree
    pub fn to_nested(&self) -> NestedTaxon {
        self.nested_from(self.root())
    }

    fn nested_from(&self, id: NodeId) -> NestedTaxon {
        let node = self.node(id);
        NestedTaxon {
            content_id: node.taxon.content_id.clone(),
            title: node.taxon.title.clone(),
            base_path: node.taxon.base_path.clone(),
            children: node.children.iter().map(|c| self.nested_from(*c)).collect(),
        }
    }
}

/// Owned recursive form of a tree, for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedTaxon {
    pub content_id: ContentId,
    pub title: String,
    pub base_path: String,
    pub children: Vec<NestedTaxon>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(id: &str, path: &str) -> TaxonSummary {
        TaxonSummary::new(id, id.to_uppercase(), path)
    }

    fn sample() -> TaxonomyTree {
        let mut tree = TaxonomyTree::new(summary("a", "/a"));
        let b = tree.add_child(tree.root(), summary("b", "/a/b"));
        tree.add_child(tree.root(), summary("c", "/a/c"));
        tree.add_child(b, summary("d", "/a/b/d"));
        tree
    }

    fn ids(tree: &TaxonomyTree, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|n| tree.node(*n).content_id().to_string()).collect()
    }

    #[test]
    fn test_pre_order() {
        let tree = sample();
        assert_eq!(ids(&tree, &tree.tree()), vec!["a", "b", "d", "c"]);
        assert_eq!(ids(&tree, &tree.descendants()), vec!["b", "d", "c"]);
    }

    #[test]
    fn test_ancestry() {
        let tree = sample();
        let d = tree.find(&ContentId::from("d")).unwrap();

        assert_eq!(ids(&tree, &tree.ancestors(d)), vec!["b", "a"]);
        assert_eq!(ids(&tree, &tree.breadcrumb_trail(d)), vec!["a", "b", "d"]);
        assert_eq!(tree.node_depth(d), 2);
        assert_eq!(tree.max_depth(), 2);
        assert!(tree.is_root(tree.root()));
        assert!(!tree.is_root(d));
        assert!(tree.node(d).is_leaf());
    }

    #[test]
    fn test_duplicate_sibling_paths() {
        let mut tree = sample();
        assert!(tree.duplicate_sibling_paths().is_empty());

        tree.add_child(tree.root(), summary("e", "/a/c"));
        assert_eq!(tree.duplicate_sibling_paths(), vec![(tree.root(), "/a/c".to_string())]);
    }

    #[test]
    fn test_nested_view() {
        let nested = sample().to_nested();
        assert_eq!(nested.children.len(), 2);
        assert_eq!(nested.children[0].children[0].title, "D");
    }

    #[test]
    fn test_unknown_node() {
        let tree = sample();
        assert!(tree.get(NodeId(42)).is_none());
        assert!(tree.children(NodeId(42)).is_empty());
    }

    #[test]
    #[should_panic(expected = "does not belong to this tree")]
    fn test_add_child_rejects_foreign_parent() {
        let mut other = sample();
        let foreign = other.add_child(NodeId(3), summary("e", "/a/b/d/e"));

        let mut tree = TaxonomyTree::new(summary("x", "/x"));
        tree.add_child(foreign, summary("y", "/x/y"));
    }

    #[test]
    fn test_foreign_parent_leaves_tree_unchanged() {
        let mut tree = TaxonomyTree::new(summary("x", "/x"));
        let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tree.add_child(NodeId(7), summary("y", "/x/y"));
        }));

        assert!(attempt.is_err());
        assert_eq!(tree.len(), 1);
        assert!(tree.root_node().is_leaf());
    }

    #[test]
    #[should_panic]
    fn test_node_panics_on_foreign_id() {
        sample().node(NodeId(42));
    }
}
