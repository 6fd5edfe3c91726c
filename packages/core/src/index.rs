//! Flattened path → node lookup over a built tree.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::declaration::JobTypeDescriptor;
use crate::tree::{Branch, BuildError, Leaf};

/// A tree node as seen through the index.
#[derive(Debug, Clone)]
pub enum Node {
    Branch(Arc<Branch>),
    Leaf(Arc<Leaf>),
}

impl Node {
    pub fn path(&self) -> &str {
        match self {
            Node::Branch(b) => b.path(),
            Node::Leaf(l) => l.path(),
        }
    }

    pub fn descriptor(&self) -> &Arc<JobTypeDescriptor> {
        match self {
            Node::Branch(b) => b.descriptor(),
            Node::Leaf(l) => l.descriptor(),
        }
    }

    pub fn as_branch(&self) -> Option<&Arc<Branch>> {
        match self {
            Node::Branch(b) => Some(b),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Arc<Leaf>> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Branch(_) => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch(_))
    }
}

/// Every node of a tree keyed by its full path.
///
/// The index shares the tree's nodes rather than owning copies; it is a
/// complete flattening, so each node has exactly one entry.
#[derive(Debug, Default)]
pub struct PathIndex {
    nodes: HashMap<String, Node>,
}

impl PathIndex {
    /// Flatten the tree under `root`: the root itself, its leaves, then each
    /// child branch recursively.
    ///
    /// Fails if two distinct nodes compute the same path.
    pub fn flatten(root: &Arc<Branch>) -> Result<Self, BuildError> {
        let mut index = Self::default();
        index.insert_branch(root)?;
        Ok(index)
    }

    fn insert_branch(&mut self, branch: &Arc<Branch>) -> Result<(), BuildError> {
        self.insert(Node::Branch(Arc::clone(branch)))?;
        for leaf in branch.leaves() {
            self.insert(Node::Leaf(Arc::clone(leaf)))?;
        }
        for child in branch.branches() {
            self.insert_branch(child)?;
        }
        Ok(())
    }

    fn insert(&mut self, node: Node) -> Result<(), BuildError> {
        match self.nodes.entry(node.path().to_string()) {
            Entry::Occupied(e) => Err(BuildError::PathCollision {
                path: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(node);
                Ok(())
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Paths whose node satisfies `pred`, sorted.
    pub fn paths_where(&self, pred: impl Fn(&Node) -> bool) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .nodes
            .iter()
            .filter(|(_, node)| pred(node))
            .map(|(path, _)| path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }
}

// --- tests -------------------------------------------------------------------
