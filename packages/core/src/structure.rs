//! The query façade routes and documentation are generated from.
//!
//! A [`Structure`] owns a built tree plus its [`PathIndex`] and answers the
//! structural queries the HTTP layer needs. It is immutable once built; every
//! query is a pure read and safe to call from any number of tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::declaration::{JobTypeDescriptor, JobTypeId, JobTypeSource};
use crate::index::{Node, PathIndex};
use crate::tree::{build_tree, Branch, BuildError, Leaf};

/// Errors returned by structural queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructureError {
    /// No node is registered at the path.
    #[error("nothing registered at {0}")]
    NotFound(String),

    /// The path is a branch where a leaf was required.
    #[error("{0} is a branch, not a job")]
    NotLeaf(String),

    /// The path is a leaf where a branch was required.
    #[error("{0} is a job, not a branch")]
    NotBranch(String),
}

/// One direct child branch, as listed by `GET <branch>/branches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubBranchInfo {
    pub path: String,
    pub name: String,
    pub description: String,
}

/// One direct child leaf, as listed by `GET <branch>/leaves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafInfo {
    pub path: String,
    pub job_type: String,
    pub name: String,
    pub description: String,
}

/// A built tree and its path index.
#[derive(Debug)]
pub struct Structure {
    tree: Arc<Branch>,
    index: PathIndex,
}

impl Structure {
    /// Wrap an already-built tree, flattening it into the path index.
    ///
    /// Fails if two leaves derive the same job type, since the job engine
    /// could not tell their submissions apart.
    pub fn new(tree: Branch) -> Result<Self, BuildError> {
        let tree = Arc::new(tree);
        let index = PathIndex::flatten(&tree)?;
        let structure = Self { tree, index };
        structure.check_job_types()?;
        tracing::info!(
            root = structure.root_path(),
            branches = structure.branch_paths().len(),
            leaves = structure.leaf_paths().len(),
            "structure built"
        );
        Ok(structure)
    }

    /// Discover the tree under `root` and index it.
    pub fn from_source<S: JobTypeSource + ?Sized>(
        source: &S,
        root: JobTypeId,
        base_path: &str,
    ) -> Result<Self, BuildError> {
        Self::new(build_tree(source, root, base_path)?)
    }

    pub fn tree(&self) -> &Arc<Branch> {
        &self.tree
    }

    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    pub fn root_path(&self) -> &str {
        self.tree.path()
    }

    /// Every branch path, sorted.
    pub fn branch_paths(&self) -> Vec<&str> {
        self.index.paths_where(Node::is_branch)
    }

    /// Every leaf path, sorted.
    pub fn leaf_paths(&self) -> Vec<&str> {
        self.index.paths_where(|n| !n.is_branch())
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.index.get(path)
    }

    /// The direct child branches of the branch at `path`, sorted by path.
    pub fn sub_branches(&self, path: &str) -> Result<Vec<SubBranchInfo>, StructureError> {
        let branch = self.branch(path)?;
        Ok(branch
            .branches()
            .map(|sub| SubBranchInfo {
                path: sub.path().to_string(),
                name: sub.descriptor().name.clone(),
                description: sub.descriptor().description.clone(),
            })
            .collect())
    }

    /// The direct child leaves of the branch at `path`, sorted by path.
    pub fn leaves(&self, path: &str) -> Result<Vec<LeafInfo>, StructureError> {
        let branch = self.branch(path)?;
        Ok(branch
            .leaves()
            .map(|leaf| LeafInfo {
                path: leaf.path().to_string(),
                job_type: leaf.job_type().to_string(),
                name: leaf.descriptor().name.clone(),
                description: leaf.descriptor().description.clone(),
            })
            .collect())
    }

    /// Resolve `path` to a leaf.
    pub fn leaf(&self, path: &str) -> Result<&Arc<Leaf>, StructureError> {
        match self.index.get(path) {
            None => Err(StructureError::NotFound(path.to_string())),
            Some(Node::Branch(_)) => Err(StructureError::NotLeaf(path.to_string())),
            Some(Node::Leaf(leaf)) => Ok(leaf),
        }
    }

    /// The parameter schema document of the leaf at `path`.
    pub fn post_schema(&self, path: &str) -> Result<&Value, StructureError> {
        self.leaf(path).map(|l| l.post_schema())
    }

    /// The job-type identifier of the leaf at `path`.
    pub fn job_type(&self, path: &str) -> Result<&str, StructureError> {
        self.leaf(path).map(|l| l.job_type())
    }

    /// Descriptors of every leaf, in leaf-path order. Used to register the
    /// runnable job types with a job-execution engine.
    pub fn job_types(&self) -> Vec<&Arc<JobTypeDescriptor>> {
        self.leaf_paths()
            .into_iter()
            .filter_map(|p| self.index.get(p))
            .map(Node::descriptor)
            .collect()
    }

    fn check_job_types(&self) -> Result<(), BuildError> {
        let mut by_type: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for path in self.leaf_paths() {
            if let Some(Node::Leaf(leaf)) = self.index.get(path) {
                by_type.entry(leaf.job_type()).or_default().push(path);
            }
        }
        match by_type.into_iter().find(|(_, paths)| paths.len() > 1) {
            Some((job_type, paths)) => Err(BuildError::JobTypeCollision {
                job_type: job_type.to_string(),
                paths: paths.into_iter().map(str::to_string).collect(),
            }),
            None => Ok(()),
        }
    }

    fn branch(&self, path: &str) -> Result<&Arc<Branch>, StructureError> {
        match self.index.get(path) {
            None => Err(StructureError::NotFound(path.to_string())),
            Some(Node::Leaf(_)) => Err(StructureError::NotBranch(path.to_string())),
            Some(Node::Branch(branch)) => Ok(branch),
        }
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::declaration::{JobTypeDeclaration, Registry};
    use crate::schema::{Field, ParamSchema};

    /// Root → {prod → {useful, also-useful, super-useful, empty-branch},
    ///         dev → {might-be-useful, needs-testing, exp → {new-thing, crazy}}}
    fn fixture() -> (Registry, JobTypeId) {
        let mut reg = Registry::new();
        let root = reg
            .register_root(
                JobTypeDeclaration::new("root")
                    .branch("root")
                    .description("root of the whole thang"),
            )
            .unwrap();
        let prod = reg
            .register(
                root,
                JobTypeDeclaration::new("prod")
                    .branch("prod")
                    .description("production jobs"),
            )
            .unwrap();
        let dev = reg
            .register(
                root,
                JobTypeDeclaration::new("dev").branch("dev").description("dev jobs"),
            )
            .unwrap();
        let exp = reg
            .register(
                dev,
                JobTypeDeclaration::new("experimental")
                    .branch("exp")
                    .description("experimental stuff that might break"),
            )
            .unwrap();
        let leaf = |name: &str, seg: &str| JobTypeDeclaration::new(name).leaf(seg);
        reg.register(
            prod,
            leaf("useful production job", "useful")
                .description("job that does useful stuff")
                .params(ParamSchema::new().field("thingum", Field::string())),
        )
        .unwrap();
        reg.register(prod, leaf("also useful", "also-useful")).unwrap();
        reg.register(prod, leaf("super useful", "super-useful")).unwrap();
        reg.register(dev, leaf("might be useful", "might-be-useful"))
            .unwrap();
        reg.register(dev, leaf("needs testing", "needs-testing")).unwrap();
        reg.register(exp, leaf("new thing", "new-thing")).unwrap();
        reg.register(exp, leaf("crazy", "crazy")).unwrap();
        reg.register(
            prod,
            JobTypeDeclaration::new("empty branch")
                .branch("empty-branch")
                .description("branch with no leaves in it"),
        )
        .unwrap();
        (reg, root)
    }

    fn structure() -> Structure {
        let (reg, root) = fixture();
        Structure::from_source(&reg, root, "").unwrap()
    }

    #[test]
    fn root_path() {
        assert_eq!(structure().root_path(), "/root");
    }

    #[test]
    fn branch_and_leaf_paths_partition_the_index() {
        let s = structure();
        let branches = s.branch_paths();
        let leaves = s.leaf_paths();

        assert_eq!(
            branches,
            vec![
                "/root",
                "/root/dev",
                "/root/dev/exp",
                "/root/prod",
                "/root/prod/empty-branch",
            ]
        );
        assert_eq!(leaves.len(), 7);

        let b: BTreeSet<&str> = branches.iter().copied().collect();
        let l: BTreeSet<&str> = leaves.iter().copied().collect();
        assert!(b.is_disjoint(&l));
        assert_eq!(b.len() + l.len(), s.index().len());
        for p in &branches {
            assert!(s.get(p).unwrap().is_branch());
        }
        for p in &leaves {
            assert!(s.get(p).unwrap().as_leaf().is_some());
        }
    }

    #[test]
    fn sub_branches_match_declarations() {
        let s = structure();
        let subs = s.sub_branches("/root").unwrap();
        assert_eq!(
            subs,
            vec![
                SubBranchInfo {
                    path: "/root/dev".into(),
                    name: "dev".into(),
                    description: "dev jobs".into(),
                },
                SubBranchInfo {
                    path: "/root/prod".into(),
                    name: "prod".into(),
                    description: "production jobs".into(),
                },
            ]
        );
        assert_eq!(s.sub_branches("/root/dev").unwrap().len(), 1);
    }

    #[test]
    fn leaves_carry_job_type() {
        let s = structure();
        let leaves = s.leaves("/root/dev/exp").unwrap();
        let paths: Vec<&str> = leaves.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["/root/dev/exp/crazy", "/root/dev/exp/new-thing"]);
        assert_eq!(leaves[0].job_type, "exp_crazy");
        assert_eq!(leaves[0].name, "crazy");
        assert!(s.leaves("/root").unwrap().is_empty());
    }

    #[test]
    fn leaf_info_serialises_job_type_camel_case() {
        let s = structure();
        let leaves = s.leaves("/root/prod").unwrap();
        let json = serde_json::to_value(&leaves[0]).unwrap();
        assert!(json.get("jobType").is_some());
        assert!(json.get("job_type").is_none());
    }

    #[test]
    fn unknown_path_is_not_found() {
        let s = structure();
        let missing = StructureError::NotFound("/unknown".into());
        assert_eq!(s.leaves("/unknown").unwrap_err(), missing);
        assert_eq!(s.sub_branches("/unknown").unwrap_err(), missing);
        assert_eq!(s.post_schema("/unknown").unwrap_err(), missing);
        assert_eq!(s.job_type("/unknown").unwrap_err(), missing);
    }

    #[test]
    fn branch_path_is_not_leaf() {
        let s = structure();
        for p in s.branch_paths() {
            assert_eq!(s.post_schema(p).unwrap_err(), StructureError::NotLeaf(p.into()));
            assert_eq!(s.job_type(p).unwrap_err(), StructureError::NotLeaf(p.into()));
        }
    }

    #[test]
    fn leaf_path_is_not_branch() {
        let s = structure();
        assert_eq!(
            s.sub_branches("/root/prod/useful").unwrap_err(),
            StructureError::NotBranch("/root/prod/useful".into())
        );
    }

    #[test]
    fn post_schema_exposes_params() {
        let s = structure();
        let schema = s.post_schema("/root/prod/useful").unwrap();
        assert!(schema["definitions"]["Params"]["properties"]
            .get("thingum")
            .is_some());
        assert_eq!(s.job_type("/root/prod/useful").unwrap(), "prod_useful");
    }

    #[test]
    fn empty_branch_lists_nothing() {
        let s = structure();
        assert!(s.branch_paths().contains(&"/root/prod/empty-branch"));
        assert!(s.sub_branches("/root/prod/empty-branch").unwrap().is_empty());
        assert!(s.leaves("/root/prod/empty-branch").unwrap().is_empty());
    }

    #[test]
    fn queries_are_idempotent() {
        let s = structure();
        assert_eq!(s.sub_branches("/root").unwrap(), s.sub_branches("/root").unwrap());
        assert_eq!(s.leaves("/root/prod").unwrap(), s.leaves("/root/prod").unwrap());
        assert_eq!(s.branch_paths(), s.branch_paths());
        assert_eq!(
            s.post_schema("/root/prod/useful").unwrap(),
            s.post_schema("/root/prod/useful").unwrap()
        );
    }

    #[test]
    fn paths_compose_from_parent_and_segment() {
        let s = structure();
        for p in s.branch_paths() {
            let branch = s.get(p).unwrap().as_branch().unwrap().clone();
            for leaf in branch.leaves() {
                let seg = leaf.descriptor().leaf.as_str();
                assert_eq!(leaf.path(), format!("{}/{}", branch.path(), seg));
            }
            for sub in branch.branches() {
                let seg = sub.descriptor().branch.as_str();
                assert_eq!(sub.path(), format!("{}/{}", branch.path(), seg));
            }
        }
    }

    #[test]
    fn job_types_follow_leaf_paths() {
        let s = structure();
        let types: Vec<&str> = s.job_types().iter().map(|d| d.job_type.as_str()).collect();
        assert_eq!(types.len(), 7);
        assert!(types.contains(&"prod_useful"));
        assert!(types.contains(&"exp_new-thing"));
    }

    #[test]
    fn leaves_deriving_the_same_job_type_are_rejected() {
        // /root/a/x and /root/q/a/x both derive "a_x".
        let mut reg = Registry::new();
        let root = reg
            .register_root(JobTypeDeclaration::new("root").branch("root"))
            .unwrap();
        let a = reg
            .register(root, JobTypeDeclaration::new("a").branch("a"))
            .unwrap();
        reg.register(
            a,
            JobTypeDeclaration::new("x")
                .leaf("x")
                .params(ParamSchema::new().field("s", Field::string().required())),
        )
        .unwrap();
        let q = reg
            .register(root, JobTypeDeclaration::new("q").branch("q"))
            .unwrap();
        let qa = reg
            .register(q, JobTypeDeclaration::new("qa").branch("a"))
            .unwrap();
        reg.register(
            qa,
            JobTypeDeclaration::new("x again")
                .leaf("x")
                .params(ParamSchema::new().field("n", Field::integer().required())),
        )
        .unwrap();

        let err = Structure::from_source(&reg, root, "").unwrap_err();
        assert_eq!(
            err,
            BuildError::JobTypeCollision {
                job_type: "a_x".into(),
                paths: vec!["/root/a/x".into(), "/root/q/a/x".into()],
            }
        );
    }
}
