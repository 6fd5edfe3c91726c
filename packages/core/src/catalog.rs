//! Catalog documents: a job-type tree declared in JSON or TOML.
//!
//! A catalog is a single nested entry. Each entry is one declaration; its
//! `children` are registered under it in document order.
//!
//! ```toml
//! name = "Spacewalk Example"
//! branch = "examples"
//! description = "example Spacewalk jobs"
//!
//! [[children]]
//! name = "FizzBuzz Job"
//! leaf = "fizz_buzz"
//! description = "Solve FizzBuzz with settable n, fizz & buzz divisors"
//!
//! [children.params.n]
//! type = "integer"
//! default = 50
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::declaration::{DeclarationError, JobTypeDeclaration, JobTypeId, Registry, Segment};
use crate::schema::{Field, FieldKind, ParamSchema};
use crate::structure::Structure;
use crate::tree::BuildError;

/// Errors raised while loading a catalog or building its structure.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("field {field:?}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Value types accepted in a field's `type` (and `items`) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    String,
    Integer,
    Number,
    Boolean,
    List,
}

/// A parameter field as written in a catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: KindName,
    /// Element type; required when `type` is `list`.
    pub items: Option<KindName>,
    #[serde(default)]
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

/// One declaration in a catalog document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub name: String,
    pub branch: Option<String>,
    pub leaf: Option<String>,
    #[serde(default)]
    pub description: String,
    pub params: Option<BTreeMap<String, FieldSpec>>,
    pub base_fields: Option<BTreeMap<String, FieldSpec>>,
    #[serde(default)]
    pub children: Vec<CatalogEntry>,
}

/// A registry of declarations plus the id of its root.
#[derive(Debug)]
pub struct Catalog {
    registry: Registry,
    root: JobTypeId,
}

impl Catalog {
    /// Wrap a registry populated in code.
    pub fn new(registry: Registry, root: JobTypeId) -> Self {
        Self { registry, root }
    }

    pub fn from_entry(entry: &CatalogEntry) -> Result<Self, CatalogError> {
        let mut registry = Registry::new();
        let root = registry.register_root(declaration(entry)?)?;
        register_children(&mut registry, root, &entry.children)?;
        Ok(Self { registry, root })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entry: CatalogEntry = serde_json::from_str(json)?;
        Self::from_entry(&entry)
    }

    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let entry: CatalogEntry = toml::from_str(text)?;
        Self::from_entry(&entry)
    }

    /// Load a catalog file. Files ending in `.toml` are parsed as TOML, all
    /// others as JSON.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&text),
            _ => Self::from_json(&text),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn root(&self) -> JobTypeId {
        self.root
    }

    /// Build the structure with every path prefixed by `base_path`.
    pub fn build(&self, base_path: &str) -> Result<Structure, CatalogError> {
        Ok(Structure::from_source(&self.registry, self.root, base_path)?)
    }
}

fn register_children(
    registry: &mut Registry,
    parent: JobTypeId,
    children: &[CatalogEntry],
) -> Result<(), CatalogError> {
    for child in children {
        let id = registry.register(parent, declaration(child)?)?;
        register_children(registry, id, &child.children)?;
    }
    Ok(())
}

fn declaration(entry: &CatalogEntry) -> Result<JobTypeDeclaration, CatalogError> {
    Ok(JobTypeDeclaration {
        name: entry.name.clone(),
        branch: Segment::from(entry.branch.clone()),
        leaf: Segment::from(entry.leaf.clone()),
        description: entry.description.clone(),
        params: entry.params.as_ref().map(param_schema).transpose()?,
        base_fields: entry.base_fields.as_ref().map(param_schema).transpose()?,
    })
}

fn param_schema(specs: &BTreeMap<String, FieldSpec>) -> Result<ParamSchema, CatalogError> {
    let mut schema = ParamSchema::new();
    for (name, spec) in specs {
        let kind = match (spec.kind, spec.items) {
            (KindName::List, Some(items)) => FieldKind::List(Box::new(scalar(name, items)?)),
            (KindName::List, None) => {
                return Err(CatalogError::InvalidField {
                    field: name.clone(),
                    reason: "list fields need an `items` type".into(),
                })
            }
            (kind, None) => scalar(name, kind)?,
            (_, Some(_)) => {
                return Err(CatalogError::InvalidField {
                    field: name.clone(),
                    reason: "`items` is only valid on list fields".into(),
                })
            }
        };
        schema = schema.field(
            name.clone(),
            Field {
                kind,
                required: spec.required,
                default: spec.default.clone(),
                description: spec.description.clone(),
            },
        );
    }
    Ok(schema)
}

fn scalar(field: &str, kind: KindName) -> Result<FieldKind, CatalogError> {
    match kind {
        KindName::String => Ok(FieldKind::String),
        KindName::Integer => Ok(FieldKind::Integer),
        KindName::Number => Ok(FieldKind::Number),
        KindName::Boolean => Ok(FieldKind::Boolean),
        KindName::List => Err(CatalogError::InvalidField {
            field: field.to_string(),
            reason: "nested lists are not supported".into(),
        }),
    }
}

// --- tests -------------------------------------------------------------------
