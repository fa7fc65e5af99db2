/*!
 * Core types and data structures for repo2md
 */

use std::path::PathBuf;

use crate::utils::{escape_line_breaks, format_file_size};

/// What was captured for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Literal text content, decoded permissively
    Text(String),
    /// File exceeded the size threshold
    TooLarge {
        /// Size in bytes
        size: u64,
    },
    /// File looked binary
    Binary,
    /// An I/O error occurred while stat'ing or reading the file
    Error(String),
}

impl FileContent {
    /// Short tag written into the block header
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TooLarge { .. } => "too-large",
            Self::Binary => "binary",
            Self::Error(_) => "error",
        }
    }

    /// Body of the block: the text itself or a placeholder notice
    pub fn body(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::TooLarge { size } => format!(
                "*File too large to include ({}, {} bytes)*",
                format_file_size(*size),
                size
            ),
            Self::Binary => "*Binary file skipped*".to_string(),
            Self::Error(description) => format!("*Error reading file: {}*", description),
        }
    }
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Relative path from the root
    pub path: PathBuf,
    /// Captured content or the reason it was omitted
    pub content: FileContent,
}

impl FileRecord {
    /// Relative path rendered with `/` separators
    pub fn display_path(&self) -> String {
        display_relative(&self.path)
    }
}

/// Render a relative path with `/` separators on every platform, one line
pub fn display_relative(path: &std::path::Path) -> String {
    path.components()
        .map(|c| escape_line_breaks(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}
