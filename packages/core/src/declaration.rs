//! Job-type declarations and the registry that records their hierarchy.
//!
//! Declarations form a rooted tree: every declaration except the root is
//! registered under a parent. Registration resolves inherited attributes and
//! derives the job-type identifier once, producing an immutable
//! [`JobTypeDescriptor`]. The tree builder only needs the [`JobTypeSource`]
//! capability: look up a descriptor and enumerate its direct children.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::schema::ParamSchema;

/// Text an unset segment renders as in paths and job-type identifiers.
pub const NOT_OVERRIDDEN: &str = "spacewalk-base";

/// A URL path segment that may be left unset.
///
/// `Unset` is distinct from an explicitly empty segment: a childless
/// declaration whose leaf segment is `Unset` is classified as an empty branch,
/// while `Set("")` opts in to a leaf identity. An empty segment can never
/// appear in a path; the tree builder rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Segment {
    #[default]
    Unset,
    Set(String),
}

impl Segment {
    pub fn new(segment: impl Into<String>) -> Self {
        Segment::Set(segment.into())
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Segment::Set(_))
    }

    /// The segment text, or [`NOT_OVERRIDDEN`] when unset.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Unset => NOT_OVERRIDDEN,
            Segment::Set(s) => s,
        }
    }

    fn or_inherit(&self, parent: &Segment) -> Segment {
        match self {
            Segment::Unset => parent.clone(),
            set => set.clone(),
        }
    }
}

impl From<Option<String>> for Segment {
    fn from(value: Option<String>) -> Self {
        value.map_or(Segment::Unset, Segment::Set)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier the job-execution engine uses for a leaf:
/// `"<branch>_<leaf>"`.
pub fn derive_job_type(branch: &Segment, leaf: &Segment) -> String {
    format!("{}_{}", branch.as_str(), leaf.as_str())
}

/// A job-type declaration as written by a service author.
///
/// Unset segments and parameter declarations are inherited from the parent
/// declaration at registration time; `name` and `description` never are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTypeDeclaration {
    pub name: String,
    pub branch: Segment,
    pub leaf: Segment,
    pub description: String,
    /// Input parameters accepted by `POST <leaf>/job`.
    pub params: Option<ParamSchema>,
    /// Extra fields of the job's stored representation, merged with `params`.
    pub base_fields: Option<ParamSchema>,
}

impl JobTypeDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, segment: impl Into<String>) -> Self {
        self.branch = Segment::new(segment);
        self
    }

    pub fn leaf(mut self, segment: impl Into<String>) -> Self {
        self.leaf = Segment::new(segment);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn params(mut self, params: ParamSchema) -> Self {
        self.params = Some(params);
        self
    }

    pub fn base_fields(mut self, fields: ParamSchema) -> Self {
        self.base_fields = Some(fields);
        self
    }
}

/// A declaration after registration: inherited attributes resolved and the
/// job type derived. Immutable and shared by every tree node built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTypeDescriptor {
    pub name: String,
    pub description: String,
    pub branch: Segment,
    pub leaf: Segment,
    pub job_type: String,
    pub params: ParamSchema,
    /// `base_fields` merged with `params`; the shape of a stored job.
    pub job_schema: ParamSchema,
    base_fields: ParamSchema,
}

impl JobTypeDescriptor {
    fn resolve(decl: JobTypeDeclaration, parent: Option<&JobTypeDescriptor>) -> Self {
        let (branch, leaf, params, base_fields) = match parent {
            Some(p) => (
                decl.branch.or_inherit(&p.branch),
                decl.leaf.or_inherit(&p.leaf),
                decl.params.unwrap_or_else(|| p.params.clone()),
                decl.base_fields.unwrap_or_else(|| p.base_fields.clone()),
            ),
            None => (
                decl.branch,
                decl.leaf,
                decl.params.unwrap_or_default(),
                decl.base_fields.unwrap_or_default(),
            ),
        };

        Self {
            job_type: derive_job_type(&branch, &leaf),
            job_schema: base_fields.merge(&params),
            name: decl.name,
            description: decl.description,
            branch,
            leaf,
            params,
            base_fields,
        }
    }

    /// Fields of the stored job that are not submission parameters.
    pub fn base_fields(&self) -> &ParamSchema {
        &self.base_fields
    }
}

/// Handle to a registered declaration. Only meaningful for the registry that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobTypeId(usize);

/// The discovery capability the tree builder depends on.
pub trait JobTypeSource {
    /// The resolved descriptor for `id`.
    fn descriptor(&self, id: JobTypeId) -> &Arc<JobTypeDescriptor>;

    /// Direct child declarations of `id`, in registration order.
    fn children(&self, id: JobTypeId) -> &[JobTypeId];
}

/// Errors raised while registering a declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("job type name must not be empty")]
    EmptyName,

    #[error("parent {0:?} is not registered")]
    UnknownParent(JobTypeId),

    #[error(
        "segment {0:?} is invalid; segments may only contain ASCII letters, \
         digits, '-', '_', '.', and '~'"
    )]
    InvalidSegment(String),
}

/// `^[A-Za-z0-9._~-]*$`: URL-unreserved characters only, so a segment can
/// never introduce a `/` or a route parameter.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]*$").expect("invalid segment regex"));

/// Whether `s` may appear as one `/`-separated component of a URL path:
/// non-empty and URL-unreserved characters only.
pub fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && SEGMENT_RE.is_match(s)
}

struct Entry {
    descriptor: Arc<JobTypeDescriptor>,
    children: Vec<JobTypeId>,
}

/// Explicit registry of job-type declarations and their parent links.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration with no parent.
    pub fn register_root(
        &mut self,
        decl: JobTypeDeclaration,
    ) -> Result<JobTypeId, DeclarationError> {
        self.insert(None, decl)
    }

    /// Register a declaration as a direct child of `parent`.
    pub fn register(
        &mut self,
        parent: JobTypeId,
        decl: JobTypeDeclaration,
    ) -> Result<JobTypeId, DeclarationError> {
        if parent.0 >= self.entries.len() {
            return Err(DeclarationError::UnknownParent(parent));
        }
        self.insert(Some(parent), decl)
    }

    pub fn get(&self, id: JobTypeId) -> Option<&Arc<JobTypeDescriptor>> {
        self.entries.get(id.0).map(|e| &e.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(
        &mut self,
        parent: Option<JobTypeId>,
        decl: JobTypeDeclaration,
    ) -> Result<JobTypeId, DeclarationError> {
        if decl.name.trim().is_empty() {
            return Err(DeclarationError::EmptyName);
        }
        for segment in [&decl.branch, &decl.leaf] {
            if let Segment::Set(s) = segment {
                if !SEGMENT_RE.is_match(s) {
                    return Err(DeclarationError::InvalidSegment(s.clone()));
                }
            }
        }

        let parent_descriptor = parent.map(|p| self.entries[p.0].descriptor.as_ref());
        let descriptor = Arc::new(JobTypeDescriptor::resolve(decl, parent_descriptor));

        let id = JobTypeId(self.entries.len());
        self.entries.push(Entry {
            descriptor,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.entries[p.0].children.push(id);
        }
        Ok(id)
    }
}

impl JobTypeSource for Registry {
    /// # Panics
    ///
    /// Panics if `id` was issued by a different registry.
    fn descriptor(&self, id: JobTypeId) -> &Arc<JobTypeDescriptor> {
        &self.entries[id.0].descriptor
    }

    fn children(&self, id: JobTypeId) -> &[JobTypeId] {
        &self.entries[id.0].children
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.len())
            .finish()
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn job_type_joins_branch_and_leaf() {
        assert_eq!(
            derive_job_type(&Segment::new("prod"), &Segment::new("useful")),
            "prod_useful"
        );
        assert_eq!(
            derive_job_type(&Segment::new("root"), &Segment::Unset),
            "root_spacewalk-base"
        );
    }

    #[test]
    fn path_segments_are_non_empty_and_unreserved() {
        for ok in ["api", "v1", "a.b", "x_y-z~"] {
            assert!(is_path_segment(ok), "{ok}");
        }
        for bad in ["", ":api", "a{", "{v}", "a/b", "a b", "*rest"] {
            assert!(!is_path_segment(bad), "{bad}");
        }
    }

    #[test]
    fn unset_is_distinct_from_empty() {
        assert!(!Segment::Unset.is_set());
        assert!(Segment::new("").is_set());
        assert_eq!(Segment::new("").as_str(), "");
        assert_eq!(Segment::from(None), Segment::Unset);
        assert_eq!(Segment::from(Some("x".to_string())), Segment::new("x"));
    }

    #[test]
    fn leaf_inherits_branch_segment_for_job_type() {
        let mut reg = Registry::new();
        let root = reg
            .register_root(JobTypeDeclaration::new("root").branch("root"))
            .unwrap();
        let prod = reg
            .register(root, JobTypeDeclaration::new("prod").branch("prod"))
            .unwrap();
        let leaf = reg
            .register(prod, JobTypeDeclaration::new("useful").leaf("useful"))
            .unwrap();

        let d = reg.descriptor(leaf);
        assert_eq!(d.branch, Segment::new("prod"));
        assert_eq!(d.job_type, "prod_useful");
        assert_eq!(reg.children(root), &[prod]);
        assert_eq!(reg.children(prod), &[leaf]);
        assert!(reg.children(leaf).is_empty());
    }

    #[test]
    fn params_and_base_fields_are_inherited_and_merged() {
        let mut reg = Registry::new();
        let root = reg
            .register_root(
                JobTypeDeclaration::new("examples")
                    .branch("examples")
                    .base_fields(
                        ParamSchema::new().field("output", Field::string()),
                    ),
            )
            .unwrap();
        let plain = reg
            .register(root, JobTypeDeclaration::new("plain").leaf("plain"))
            .unwrap();
        let custom = reg
            .register(
                root,
                JobTypeDeclaration::new("custom")
                    .leaf("custom")
                    .params(ParamSchema::new().field("n", Field::integer())),
            )
            .unwrap();

        assert!(reg.descriptor(plain).params.is_empty());
        assert_eq!(reg.descriptor(plain).job_schema.len(), 1);

        let custom = reg.descriptor(custom);
        assert_eq!(custom.params.len(), 1);
        assert!(custom.job_schema.get("n").is_some());
        assert!(custom.job_schema.get("output").is_some());
        assert_eq!(custom.base_fields().len(), 1);
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = Registry::new();
        let err = reg
            .register_root(JobTypeDeclaration::new("  ").branch("root"))
            .unwrap_err();
        assert_eq!(err, DeclarationError::EmptyName);
        assert!(reg.is_empty());
    }

    #[test]
    fn segment_with_slash_rejected() {
        let mut reg = Registry::new();
        let err = reg
            .register_root(JobTypeDeclaration::new("root").branch("a/b"))
            .unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidSegment(s) if s == "a/b"));
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut reg = Registry::new();
        let err = reg
            .register(JobTypeId(3), JobTypeDeclaration::new("orphan").leaf("x"))
            .unwrap_err();
        assert_eq!(err, DeclarationError::UnknownParent(JobTypeId(3)));
    }
}
