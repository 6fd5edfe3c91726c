//! The route table generated from a [`Structure`].
//!
//! Every branch gets `<path>/branches` and `<path>/leaves`; every leaf gets
//! `<path>/post-schema` and `<path>/job`. Four job-lifecycle lookups keyed by
//! job instance id hang off the root and are served by the job-execution
//! engine, not through the path index.

use std::fmt;

use crate::structure::Structure;

pub const BRANCHES: &str = "branches";
pub const LEAVES: &str = "leaves";
pub const POST_SCHEMA: &str = "post-schema";
pub const RUN_JOB: &str = "job";
pub const PROGRESS: &str = "progress";
pub const INFO: &str = "info";
pub const DATA: &str = "data";
pub const DUMP: &str = "dump";

/// Route parameter that captures a job instance id.
pub const UUID_PARAM: &str = "{uuid}";

/// HTTP method a route answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// What a generated route does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// List a branch's direct sub-branches.
    SubBranches,
    /// List a branch's direct leaves.
    Leaves,
    /// Document a leaf's parameters.
    PostSchema,
    /// Submit a job for a leaf.
    RunJob,
    Progress,
    Info,
    Data,
    Dump,
}

impl EndpointKind {
    pub fn method(self) -> Method {
        match self {
            EndpointKind::RunJob => Method::Post,
            _ => Method::Get,
        }
    }

    /// The path component appended after the node path (or root path).
    pub fn resource(self) -> &'static str {
        match self {
            EndpointKind::SubBranches => BRANCHES,
            EndpointKind::Leaves => LEAVES,
            EndpointKind::PostSchema => POST_SCHEMA,
            EndpointKind::RunJob => RUN_JOB,
            EndpointKind::Progress => PROGRESS,
            EndpointKind::Info => INFO,
            EndpointKind::Data => DATA,
            EndpointKind::Dump => DUMP,
        }
    }

    /// Whether the route resolves its node through the path index.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            EndpointKind::SubBranches
                | EndpointKind::Leaves
                | EndpointKind::PostSchema
                | EndpointKind::RunJob
        )
    }
}

/// One generated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: String,
    pub kind: EndpointKind,
}

impl Route {
    fn structural(path: &str, kind: EndpointKind) -> Self {
        Self {
            pattern: format!("{path}/{}", kind.resource()),
            kind,
        }
    }

    fn lifecycle(root: &str, kind: EndpointKind) -> Self {
        Self {
            pattern: format!("{root}/{}/{UUID_PARAM}", kind.resource()),
            kind,
        }
    }

    pub fn method(&self) -> Method {
        self.kind.method()
    }
}

/// Strip the endpoint resource from a request path, leaving the node path.
///
/// `"/root/prod/branches"` with [`EndpointKind::SubBranches`] gives
/// `Some("/root/prod")`. Returns `None` for lifecycle kinds or when the
/// suffix is absent.
pub fn node_path(request_path: &str, kind: EndpointKind) -> Option<&str> {
    if !kind.is_structural() {
        return None;
    }
    request_path
        .strip_suffix(kind.resource())
        .and_then(|p| p.strip_suffix('/'))
}

/// Generate the full route table for `structure`.
///
/// Branch routes come first (in branch-path order), then leaf routes, then the
/// four lifecycle routes rooted at the root path.
pub fn build_routes(structure: &Structure) -> Vec<Route> {
    let mut routes = Vec::new();

    for path in structure.branch_paths() {
        routes.push(Route::structural(path, EndpointKind::SubBranches));
        routes.push(Route::structural(path, EndpointKind::Leaves));
    }

    for path in structure.leaf_paths() {
        routes.push(Route::structural(path, EndpointKind::PostSchema));
        routes.push(Route::structural(path, EndpointKind::RunJob));
    }

    let root = structure.root_path();
    for kind in [
        EndpointKind::Progress,
        EndpointKind::Info,
        EndpointKind::Data,
        EndpointKind::Dump,
    ] {
        routes.push(Route::lifecycle(root, kind));
    }

    routes
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{JobTypeDeclaration, Registry};

    fn structure() -> Structure {
        let mut reg = Registry::new();
        let root = reg
            .register_root(JobTypeDeclaration::new("root").branch("root"))
            .unwrap();
        let prod = reg
            .register(root, JobTypeDeclaration::new("prod").branch("prod"))
            .unwrap();
        reg.register(prod, JobTypeDeclaration::new("useful").leaf("useful"))
            .unwrap();
        Structure::from_source(&reg, root, "").unwrap()
    }

    #[test]
    fn table_covers_every_node_and_lifecycle() {
        let routes = build_routes(&structure());
        let table: Vec<(String, EndpointKind)> =
            routes.into_iter().map(|r| (r.pattern, r.kind)).collect();

        let expected = vec![
            ("/root/branches", EndpointKind::SubBranches),
            ("/root/leaves", EndpointKind::Leaves),
            ("/root/prod/branches", EndpointKind::SubBranches),
            ("/root/prod/leaves", EndpointKind::Leaves),
            ("/root/prod/useful/post-schema", EndpointKind::PostSchema),
            ("/root/prod/useful/job", EndpointKind::RunJob),
            ("/root/progress/{uuid}", EndpointKind::Progress),
            ("/root/info/{uuid}", EndpointKind::Info),
            ("/root/data/{uuid}", EndpointKind::Data),
            ("/root/dump/{uuid}", EndpointKind::Dump),
        ];
        let expected: Vec<(String, EndpointKind)> =
            expected.into_iter().map(|(p, k)| (p.to_string(), k)).collect();
        assert_eq!(table, expected);
    }

    #[test]
    fn only_run_job_posts() {
        for route in build_routes(&structure()) {
            let want = if route.kind == EndpointKind::RunJob {
                Method::Post
            } else {
                Method::Get
            };
            assert_eq!(route.method(), want, "{}", route.pattern);
        }
    }

    #[test]
    fn node_path_strips_resource() {
        assert_eq!(
            node_path("/root/prod/branches", EndpointKind::SubBranches),
            Some("/root/prod")
        );
        assert_eq!(
            node_path("/root/prod/useful/post-schema", EndpointKind::PostSchema),
            Some("/root/prod/useful")
        );
        assert_eq!(node_path("/root/prod/leaves", EndpointKind::SubBranches), None);
        assert_eq!(node_path("/root/progress/{uuid}", EndpointKind::Progress), None);
    }
}
