//! Plain-text rendering of a [`Structure`] for terminals and logs.
//!
//! The output is stable but not a canonical format; only the JSON served over
//! HTTP is normative.

use crate::routes::Route;
use crate::structure::Structure;
use crate::tree::Branch;

/// Render the tree as an indented outline.
///
/// ```text
/// Spacewalk tree  /examples  1 branch, 2 leaves
/// ─────────────────────────────────────────────
/// examples/  Spacewalk Example
///   fizz_buzz  FizzBuzz Job  [examples_fizz_buzz]
///   waste_time  Waste Time Job  [examples_waste_time]
/// ```
pub fn render_tree(structure: &Structure) -> String {
    let branches = structure.branch_paths().len();
    let leaves = structure.leaf_paths().len();
    let header = format!(
        "Spacewalk tree  {}  {} branch{}, {} lea{}",
        structure.root_path(),
        branches,
        if branches == 1 { "" } else { "es" },
        leaves,
        if leaves == 1 { "f" } else { "ves" },
    );
    let rule = "─".repeat(header.chars().count());

    let mut out = format!("{header}\n{rule}\n");
    render_branch(structure.tree(), 0, &mut out);
    out
}

fn render_branch(branch: &Branch, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let segment = branch.path().rsplit('/').next().unwrap_or_default();
    out.push_str(&format!(
        "{indent}{segment}/  {}\n",
        branch.descriptor().name
    ));

    for leaf in branch.leaves() {
        out.push_str(&format!(
            "{indent}  {}  {}  [{}]\n",
            leaf.descriptor().leaf,
            leaf.descriptor().name,
            leaf.job_type()
        ));
    }
    for sub in branch.branches() {
        render_branch(sub, depth + 1, out);
    }
}

/// Render a route table, one `METHOD pattern` line per route.
pub fn render_routes(routes: &[Route]) -> String {
    let mut out = String::new();
    for route in routes {
        out.push_str(&format!("{:<5} {}\n", route.method().to_string(), route.pattern));
    }
    out
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{JobTypeDeclaration, Registry};
    use crate::routes::build_routes;

    fn structure() -> Structure {
        let mut reg = Registry::new();
        let root = reg
            .register_root(JobTypeDeclaration::new("Spacewalk Example").branch("examples"))
            .unwrap();
        reg.register(root, JobTypeDeclaration::new("Waste Time Job").leaf("waste_time"))
            .unwrap();
        reg.register(root, JobTypeDeclaration::new("FizzBuzz Job").leaf("fizz_buzz"))
            .unwrap();
        Structure::from_source(&reg, root, "").unwrap()
    }

    #[test]
    fn tree_outline() {
        let text = render_tree(&structure());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Spacewalk tree  /examples  1 branch, 2 leaves");
        assert_eq!(lines[2], "examples/  Spacewalk Example");
        assert_eq!(lines[3], "  fizz_buzz  FizzBuzz Job  [examples_fizz_buzz]");
        assert_eq!(lines[4], "  waste_time  Waste Time Job  [examples_waste_time]");
    }

    #[test]
    fn routes_listing() {
        let text = render_routes(&build_routes(&structure()));
        assert!(text.contains("GET   /examples/branches\n"));
        assert!(text.contains("POST  /examples/fizz_buzz/job\n"));
        assert_eq!(text.lines().count(), 10);
    }
}
