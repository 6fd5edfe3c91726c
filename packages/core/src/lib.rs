//! Tree discovery and path routing for auto-generated job APIs.
//!
//! Service authors declare a hierarchy of job types. Each declaration is a
//! grouping **branch** or a runnable **leaf**. This crate discovers the tree,
//! assigns every node a URL path, indexes the paths, and answers the
//! structural queries an HTTP layer needs to generate its routes and
//! parameter documentation. It never executes jobs.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`declaration`] | [`JobTypeDeclaration`], [`Registry`], job-type derivation |
//! | [`schema`] | [`ParamSchema`] and its JSON-Schema rendering |
//! | [`tree`] | [`Branch`], [`Leaf`], [`build_tree`] |
//! | [`index`] | [`PathIndex`]: full path → node |
//! | [`structure`] | [`Structure`]: the query façade |
//! | [`routes`] | [`build_routes`]: the generated route table |
//! | [`catalog`] | JSON/TOML catalog documents |
//! | [`render`] | Plain-text rendering of trees and route tables |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use spacewalk::{Field, JobTypeDeclaration, ParamSchema, Registry, Structure};
//!
//! let mut reg = Registry::new();
//! let root = reg.register_root(JobTypeDeclaration::new("root").branch("root"))?;
//! let prod = reg.register(root, JobTypeDeclaration::new("prod").branch("prod"))?;
//! reg.register(
//!     prod,
//!     JobTypeDeclaration::new("useful")
//!         .leaf("useful")
//!         .params(ParamSchema::new().field("thingum", Field::string())),
//! )?;
//!
//! let structure = Structure::from_source(&reg, root, "")?;
//! assert_eq!(structure.job_type("/root/prod/useful")?, "prod_useful");
//! ```

pub mod catalog;
pub mod declaration;
pub mod index;
pub mod render;
pub mod routes;
pub mod schema;
pub mod structure;
pub mod tree;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use declaration::{
    derive_job_type, is_path_segment, DeclarationError, JobTypeDeclaration, JobTypeDescriptor,
    JobTypeId, JobTypeSource, Registry, Segment,
};
pub use index::{Node, PathIndex};
pub use routes::{build_routes, EndpointKind, Method, Route};
pub use schema::{Field, FieldKind, ParamSchema};
pub use structure::{LeafInfo, Structure, StructureError, SubBranchInfo};
pub use tree::{build_tree, Branch, BuildError, Leaf};
