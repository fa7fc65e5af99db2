/*!
 * Name-based path filtering
 *
 * A single `Filter` is built per run and shared by the tree renderer and the
 * content serializer, so both sections always agree on the included set.
 */

use std::collections::HashSet;

use glob_match::glob_match;
use walkdir::DirEntry;

/// Directory names that are never descended into
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    // Editors
    ".vscode",
    ".idea",
    // Build & dist
    "dist",
    "build",
    ".next",
    "target",
    // Caches
    ".cache",
    "__pycache__",
    ".ipynb_checkpoints",
    // Virtual environments
    "venv",
    ".venv",
    "env",
];

/// File names that are always skipped
pub const DEFAULT_IGNORE_FILES: &[&str] = &[".DS_Store", "Thumbs.db", ".gitignore", ".env"];

/// Wildcard patterns matched against file names
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "*.log", "*.pyc", "*.pyo", "*.pyd", "*.so", "*.dylib", "*.dll", "*.ipynb", "*.o", "*.class",
    "*.exe",
];

/// Exclusion rules evaluated purely on a basename and its kind
#[derive(Debug, Clone)]
pub struct Filter {
    dirs: HashSet<String>,
    files: HashSet<String>,
    patterns: Vec<String>,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Filter {
    /// Create a filter from the built-in defaults plus extra file patterns
    pub fn new(extra_patterns: &[String]) -> Self {
        let patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(
                extra_patterns
                    .iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
            )
            .collect();

        Self {
            dirs: DEFAULT_IGNORE_DIRS.iter().map(|d| d.to_string()).collect(),
            files: DEFAULT_IGNORE_FILES.iter().map(|f| f.to_string()).collect(),
            patterns,
        }
    }

    /// Decide whether an entry with this basename should be excluded
    pub fn is_excluded(&self, name: &str, is_dir: bool) -> bool {
        if is_dir {
            return self.dirs.contains(name);
        }

        if self.files.contains(name) {
            return true;
        }

        self.patterns.iter().any(|p| glob_match(p, name))
    }

    /// Apply the filter to a walkdir entry, classified by `is_directory`
    pub fn excludes_entry(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.is_excluded(&name, is_directory(entry))
    }

    /// The wildcard patterns in effect
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Whether an entry counts as a directory. A symlink is classified by its
/// target, but walkers never descend through it.
pub fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}
