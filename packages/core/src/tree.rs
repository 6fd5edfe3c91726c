//! The branch/leaf tree and the recursive builder that discovers it.
//!
//! A declaration is a **branch** if it has at least one direct child, or if
//! its leaf segment was never set. Otherwise it is a **leaf**. Branches
//! contribute `<parent>/<branch segment>` to the path; leaves sit at
//! `<parent>/<leaf segment>` and are never recursed into.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::declaration::{JobTypeDescriptor, JobTypeId, JobTypeSource};

/// Construction-time inconsistencies in a declaration tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("duplicate segment {segment:?} among the children of {parent}")]
    DuplicateSegment { parent: String, segment: String },

    #[error("two nodes share the path {path}")]
    PathCollision { path: String },

    #[error("empty segment under {parent:?}; a path component must not be empty")]
    EmptySegment { parent: String },

    #[error("job type {job_type:?} is derived by more than one leaf: {paths:?}")]
    JobTypeCollision { job_type: String, paths: Vec<String> },
}

/// A grouping node. Owns its child branches and leaves, keyed by segment.
#[derive(Debug)]
pub struct Branch {
    descriptor: Arc<JobTypeDescriptor>,
    path: String,
    branches: BTreeMap<String, Arc<Branch>>,
    leaves: BTreeMap<String, Arc<Leaf>>,
}

impl Branch {
    /// Assemble a branch at `path` from already-built children.
    ///
    /// Fails if two child branches (or two leaves) share a segment.
    pub fn new(
        descriptor: Arc<JobTypeDescriptor>,
        branches: Vec<Branch>,
        leaves: Vec<Leaf>,
        path: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let path = path.into();

        let mut branch_map = BTreeMap::new();
        for b in branches {
            let segment = b.descriptor.branch.as_str().to_string();
            if branch_map.contains_key(&segment) {
                return Err(BuildError::DuplicateSegment { parent: path, segment });
            }
            branch_map.insert(segment, Arc::new(b));
        }

        let mut leaf_map = BTreeMap::new();
        for l in leaves {
            let segment = l.descriptor.leaf.as_str().to_string();
            if leaf_map.contains_key(&segment) {
                return Err(BuildError::DuplicateSegment { parent: path, segment });
            }
            leaf_map.insert(segment, Arc::new(l));
        }

        Ok(Self {
            descriptor,
            path,
            branches: branch_map,
            leaves: leaf_map,
        })
    }

    pub fn descriptor(&self) -> &Arc<JobTypeDescriptor> {
        &self.descriptor
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Direct child branches, in segment order.
    pub fn branches(&self) -> impl Iterator<Item = &Arc<Branch>> {
        self.branches.values()
    }

    /// Direct child leaves, in segment order.
    pub fn leaves(&self) -> impl Iterator<Item = &Arc<Leaf>> {
        self.leaves.values()
    }

    pub fn branch(&self, segment: &str) -> Option<&Arc<Branch>> {
        self.branches.get(segment)
    }

    pub fn leaf(&self, segment: &str) -> Option<&Arc<Leaf>> {
        self.leaves.get(segment)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.leaves.is_empty()
    }
}

/// A runnable endpoint.
#[derive(Debug)]
pub struct Leaf {
    descriptor: Arc<JobTypeDescriptor>,
    path: String,
    post_schema: Value,
}

impl Leaf {
    /// Create the leaf that sits directly under `parent_path`.
    pub fn new(descriptor: Arc<JobTypeDescriptor>, parent_path: &str) -> Self {
        let path = format!("{parent_path}/{}", descriptor.leaf.as_str());
        let post_schema = descriptor.params.to_json_schema();
        Self {
            descriptor,
            path,
            post_schema,
        }
    }

    pub fn descriptor(&self) -> &Arc<JobTypeDescriptor> {
        &self.descriptor
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The JSON-Schema document for this leaf's parameters.
    pub fn post_schema(&self) -> &Value {
        &self.post_schema
    }

    pub fn job_type(&self) -> &str {
        &self.descriptor.job_type
    }
}

/// The classification rule: children or an unset leaf segment make a branch.
pub fn is_branch<S: JobTypeSource + ?Sized>(source: &S, id: JobTypeId) -> bool {
    !source.children(id).is_empty() || !source.descriptor(id).leaf.is_set()
}

/// Build the tree rooted at `root`, prefixing every path with `base_path`.
///
/// The root is always returned as a [`Branch`]. If it classifies as a leaf its
/// path uses the leaf segment, but it is still treated as a (childless) branch.
pub fn build_tree<S: JobTypeSource + ?Sized>(
    source: &S,
    root: JobTypeId,
    base_path: &str,
) -> Result<Branch, BuildError> {
    let descriptor = source.descriptor(root);
    let segment = if is_branch(source, root) {
        &descriptor.branch
    } else {
        &descriptor.leaf
    };
    if segment.as_str().is_empty() {
        return Err(BuildError::EmptySegment {
            parent: base_path.to_string(),
        });
    }
    let path = format!("{base_path}/{}", segment.as_str());

    let mut branches = Vec::new();
    let mut leaves = Vec::new();
    for &child in source.children(root) {
        if is_branch(source, child) {
            branches.push(build_tree(source, child, &path)?);
        } else {
            let descriptor = source.descriptor(child);
            if descriptor.leaf.as_str().is_empty() {
                return Err(BuildError::EmptySegment { parent: path });
            }
            leaves.push(Leaf::new(Arc::clone(descriptor), &path));
        }
    }

    tracing::debug!(
        path = %path,
        branches = branches.len(),
        leaves = leaves.len(),
        "built branch"
    );

    Branch::new(Arc::clone(descriptor), branches, leaves, path)
}

// --- tests -------------------------------------------------------------------
