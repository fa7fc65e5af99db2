/*!
 * repo2md - Serialize a repository into a single Markdown document
 *
 * Renders a filtered file tree followed by the contents of every included
 * file, each wrapped in length-prefixed sentinels so the document can be
 * split back into files losslessly.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod report;
pub mod serializer;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{Repo2MdError, Result};
pub use filter::Filter;
pub use parser::{parse_document, ParsedDocument};
pub use report::{Reporter, ScanReport};
pub use serializer::{ContentSerializer, MAX_FILE_SIZE};
pub use tree::TreeRenderer;
pub use types::{FileContent, FileRecord};
pub use writer::{Document, MarkdownWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
