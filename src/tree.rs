/*!
 * Indented file tree rendering
 */

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::filter::{is_directory, Filter};
use crate::utils::escape_line_breaks;

/// Indentation added per nesting level
const INDENT_UNIT: &str = "  ";

/// Renders the surviving directory structure as a nested outline
pub struct TreeRenderer {
    filter: Arc<Filter>,
}

impl TreeRenderer {
    /// Create a new renderer sharing the run's filter
    pub fn new(filter: Arc<Filter>) -> Self {
        Self { filter }
    }

    /// Render the tree below `root`, one entry per line
    pub fn render(&self, root: &Path) -> String {
        let mut lines = Vec::new();
        self.render_directory(root, 0, &mut lines);
        lines.join("\n")
    }

    fn render_directory(&self, dir: &Path, depth: usize, lines: &mut Vec<String>) {
        let indent = INDENT_UNIT.repeat(depth);

        for entry in self.list_children(dir) {
            let name = escape_line_breaks(&entry.file_name().to_string_lossy());
            if is_directory(&entry) {
                lines.push(format!("{}- 📂 {}/", indent, name));
                // Symlinked directories are listed but never entered
                if entry.file_type().is_dir() {
                    self.render_directory(entry.path(), depth + 1, lines);
                }
            } else {
                lines.push(format!("{}- 📄 {}", indent, name));
            }
        }
    }

    /// Immediate children of `dir` that survive the filter, sorted by name
    fn list_children(&self, dir: &Path) -> Vec<DirEntry> {
        let mut children = Vec::new();

        for result in WalkDir::new(dir).min_depth(1).max_depth(1) {
            match result {
                Ok(entry) => {
                    if self.filter.excludes_entry(&entry) {
                        debug!("Skipping {}", entry.path().display());
                        continue;
                    }
                    children.push(entry);
                }
                Err(e) => warn!("Error reading {}: {}", dir.display(), e),
            }
        }

        children.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_render_nested() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/nested/deep.rs"), "x").unwrap();
        fs::write(dir.path().join("src/lib.rs"), "x").unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();

        let renderer = TreeRenderer::new(Arc::new(Filter::default()));
        let tree = renderer.render(dir.path());

        assert_eq!(
            tree,
            "- 📄 README.md\n- 📂 src/\n  - 📄 lib.rs\n  - 📂 nested/\n    - 📄 deep.rs"
        );
    }

    #[test]
    fn test_sorted_regardless_of_creation_order() {
        let dir = tempdir().unwrap();
        for name in ["zeta.txt", "alpha.txt", "Mid.txt", "beta.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let renderer = TreeRenderer::new(Arc::new(Filter::default()));
        let tree = renderer.render(dir.path());

        assert_eq!(
            tree,
            "- 📄 Mid.txt\n- 📄 alpha.txt\n- 📄 beta.txt\n- 📄 zeta.txt"
        );
    }

    #[test]
    fn test_empty_directory_renders_empty() {
        let dir = tempdir().unwrap();
        let renderer = TreeRenderer::new(Arc::new(Filter::default()));
        assert_eq!(renderer.render(dir.path()), "");
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(dir.path().join("app.js"), "x").unwrap();

        let renderer = TreeRenderer::new(Arc::new(Filter::default()));
        let tree = renderer.render(dir.path());

        assert_eq!(tree, "- 📄 app.js");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_listed_not_entered() {
        use std::os::unix::fs::symlink;

        let target = tempdir().unwrap();
        fs::write(target.path().join("inner.rs"), "x").unwrap();
        let dir = tempdir().unwrap();
        symlink(target.path(), dir.path().join("linked")).unwrap();
        symlink(target.path(), dir.path().join("node_modules")).unwrap();

        let renderer = TreeRenderer::new(Arc::new(Filter::default()));
        assert_eq!(renderer.render(dir.path()), "- 📂 linked/");
    }
}
