//! `swalk`: Spacewalk command-line interface.
//!
//! Builds the job-type tree declared by a catalog file offline and shows what
//! the server would expose for it:
//!
//! - **`validate`**: build the tree and report its size.
//! - **`tree`**: print the tree as an outline.
//! - **`routes`**: print every generated route.
//! - **`schema`**: print a leaf's post-schema document.
//! - **`job-type`**: print a leaf's job-type identifier.
//!
//! Catalogs are JSON or TOML, chosen by file extension. Pass `-` to read a
//! JSON catalog from stdin.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use spacewalk::{build_routes, Catalog, Structure};

/// swalk: Spacewalk CLI
///
/// Validate job-type catalogs and inspect the REST API they generate.
#[derive(Parser)]
#[command(name = "swalk", version, about, long_about = None)]
struct Cli {
    /// Prefix prepended to the root branch path, e.g. `/api`.
    #[arg(long, global = true, env = "SPACEWALK_BASE_PATH", default_value = "")]
    base_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the tree declared by a catalog and report its size.
    ///
    /// Exits 0 if the catalog builds, 2 otherwise.
    Validate {
        /// Path to a catalog file, or `-` for JSON on stdin.
        catalog: PathBuf,
    },

    /// Print the tree as an indented outline of branches and leaves.
    Tree {
        /// Path to a catalog file, or `-` for JSON on stdin.
        catalog: PathBuf,
    },

    /// Print every route the server would mount, one per line.
    Routes {
        /// Path to a catalog file, or `-` for JSON on stdin.
        catalog: PathBuf,
    },

    /// Print the post-schema document of the leaf at PATH.
    ///
    /// Exits 1 if PATH is unknown or names a branch.
    Schema {
        /// Path to a catalog file, or `-` for JSON on stdin.
        catalog: PathBuf,

        /// Leaf path, e.g. `/examples/fizz_buzz`.
        path: String,
    },

    /// Print the job-type identifier of the leaf at PATH.
    ///
    /// Exits 1 if PATH is unknown or names a branch.
    JobType {
        /// Path to a catalog file, or `-` for JSON on stdin.
        catalog: PathBuf,

        /// Leaf path, e.g. `/examples/fizz_buzz`.
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { catalog } => {
            let structure = load(&catalog, &cli.base_path);
            println!(
                "valid: root {}, {} branch(es), {} leaf/leaves",
                structure.root_path(),
                structure.branch_paths().len(),
                structure.leaf_paths().len()
            );
        }

        Command::Tree { catalog } => {
            let structure = load(&catalog, &cli.base_path);
            print!("{}", spacewalk::render::render_tree(&structure));
        }

        Command::Routes { catalog } => {
            let structure = load(&catalog, &cli.base_path);
            print!(
                "{}",
                spacewalk::render::render_routes(&build_routes(&structure))
            );
        }

        Command::Schema { catalog, path } => {
            let structure = load(&catalog, &cli.base_path);
            match structure.post_schema(&path) {
                Ok(schema) => match serde_json::to_string_pretty(schema) {
                    Ok(text) => println!("{text}"),
                    Err(e) => fatal(&format!("failed to serialise schema: {e}")),
                },
                Err(e) => query_failed(&e),
            }
        }

        Command::JobType { catalog, path } => {
            let structure = load(&catalog, &cli.base_path);
            match structure.job_type(&path) {
                Ok(job_type) => println!("{job_type}"),
                Err(e) => query_failed(&e),
            }
        }
    }
}

/// Load the catalog at `path` (or JSON from stdin when it is `"-"`) and build
/// its structure.
fn load(path: &Path, base_path: &str) -> Structure {
    let catalog = if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {e}")));
        Catalog::from_json(&buf)
    } else {
        Catalog::load(path)
    };
    catalog
        .and_then(|c| c.build(base_path))
        .unwrap_or_else(|e| fatal(&e.to_string()))
}

/// Print a structure query error to stderr and exit with code 1.
fn query_failed(err: &dyn std::error::Error) -> ! {
    eprintln!("swalk: {err}");
    process::exit(1);
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("swalk: {msg}");
    process::exit(2);
}
