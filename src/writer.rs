/*!
 * Markdown document assembly for repo2md
 */

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use log::info;

use crate::config::Config;
use crate::filter::Filter;
use crate::serializer::ContentSerializer;
use crate::tree::TreeRenderer;
use crate::types::FileRecord;
use crate::utils::file_name_lossy;

/// Opening sentinel prefix of a file block
pub const START_MARKER: &str = "<<< START FILE: ";
/// Closing sentinel prefix of a file block
pub const END_MARKER: &str = "<<< END FILE: ";
/// Suffix shared by both sentinels
pub const MARKER_SUFFIX: &str = " >>>";

/// Title line prefix
pub const TITLE_PREFIX: &str = "# Repository: ";
/// Timestamp line prefix
pub const GENERATED_PREFIX: &str = "*Generated on: ";
/// Tree section heading
pub const TREE_HEADING: &str = "## File Tree";
/// Files section heading
pub const FILES_HEADING: &str = "## Files";

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct Document {
    /// Repository name used in the title
    pub name: String,
    /// The rendered Markdown
    pub markdown: String,
    /// File records in output order
    pub records: Vec<FileRecord>,
}

/// Builds the Markdown document for a repository
pub struct MarkdownWriter {
    /// Writer configuration
    config: Config,
    filter: Arc<Filter>,
    progress: Arc<ProgressBar>,
}

impl MarkdownWriter {
    /// Create a new writer. The filter is shared by both passes.
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        let filter = Arc::new(Filter::new(&config.ignore_patterns));
        Self {
            config,
            filter,
            progress,
        }
    }

    /// The filter used for both the tree and the file sections
    pub fn filter(&self) -> Arc<Filter> {
        Arc::clone(&self.filter)
    }

    /// Generate the document for the configured root
    pub fn generate(&self, generated_at: DateTime<Local>) -> io::Result<Document> {
        let root = fs::canonicalize(&self.config.target_dir)?;
        let name = repository_name(&root);
        info!("Processing: {}", root.display());

        let renderer = TreeRenderer::new(self.filter());
        let serializer = ContentSerializer::new(self.filter(), Arc::clone(&self.progress));

        let (tree, records) = rayon::join(|| renderer.render(&root), || serializer.serialize(&root));

        let markdown = assemble(&name, &generated_at, &tree, &records);
        Ok(Document {
            name,
            markdown,
            records,
        })
    }

    /// Write the document to the configured output file, or stdout
    pub fn write(&self, document: &Document) -> io::Result<()> {
        match &self.config.output_file {
            Some(path) => write_to_file(path, &document.markdown),
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(document.markdown.as_bytes())?;
                handle.flush()
            }
        }
    }

    /// Where the document ends up, for reporting
    pub fn destination(&self) -> String {
        self.config
            .output_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    }
}

fn write_to_file(path: &Path, markdown: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(markdown.as_bytes())?;
    writer.flush()
}

/// Basename of the canonical root, falling back to the full path for `/`
pub fn repository_name(root: &Path) -> String {
    let name = file_name_lossy(root);
    if name.is_empty() {
        root.display().to_string()
    } else {
        name
    }
}

/// Join header, tree and file blocks into the final document
pub fn assemble(
    name: &str,
    generated_at: &DateTime<Local>,
    tree: &str,
    records: &[FileRecord],
) -> String {
    let blocks = records
        .iter()
        .map(format_block)
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::new();
    out.push_str(&format!("{}{}\n\n", TITLE_PREFIX, name));
    out.push_str(&format!(
        "{}{}*\n\n",
        GENERATED_PREFIX,
        generated_at.to_rfc3339()
    ));
    out.push_str(&format!("{}\n\n", TREE_HEADING));
    if !tree.is_empty() {
        out.push_str(tree);
        out.push_str("\n\n");
    }
    out.push_str(&format!("{}\n", FILES_HEADING));
    if !blocks.is_empty() {
        out.push('\n');
        out.push_str(&blocks);
    }
    out
}

/// Format one file block. The header carries the body's byte length.
pub fn format_block(record: &FileRecord) -> String {
    let path = record.display_path();
    let body = record.content.body();
    format!(
        "{start}{path} [{kind}, {len} bytes]{suffix}\n{body}\n{end}{path}{suffix}\n",
        start = START_MARKER,
        end = END_MARKER,
        suffix = MARKER_SUFFIX,
        path = path,
        kind = record.content.kind(),
        len = body.len(),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileContent;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_format_block_text() {
        let record = FileRecord {
            path: PathBuf::from("src/a.py"),
            content: FileContent::Text("print(1)\n".to_string()),
        };
        assert_eq!(
            format_block(&record),
            "<<< START FILE: src/a.py [text, 9 bytes] >>>\nprint(1)\n\n<<< END FILE: src/a.py >>>\n"
        );
    }

    #[test]
    fn test_format_block_placeholders() {
        let binary = FileRecord {
            path: PathBuf::from("img.png"),
            content: FileContent::Binary,
        };
        assert!(format_block(&binary).contains("[binary, 21 bytes]"));
        assert!(format_block(&binary).contains("*Binary file skipped*"));

        let large = FileRecord {
            path: PathBuf::from("big.txt"),
            content: FileContent::TooLarge { size: 512_001 },
        };
        assert!(format_block(&large)
            .contains("*File too large to include (500.00 KB, 512001 bytes)*"));
    }

    #[test]
    fn test_assemble_layout() {
        let records = vec![FileRecord {
            path: PathBuf::from("a.txt"),
            content: FileContent::Text("hi".to_string()),
        }];
        let doc = assemble("demo", &fixed_time(), "- 📄 a.txt", &records);

        let expected_header = format!(
            "# Repository: demo\n\n*Generated on: {}*\n\n## File Tree\n\n- 📄 a.txt\n\n## Files\n\n",
            fixed_time().to_rfc3339()
        );
        assert!(doc.starts_with(&expected_header));
        assert!(doc.ends_with("<<< END FILE: a.txt >>>\n"));
    }

    #[test]
    fn test_assemble_empty_repository() {
        let doc = assemble("empty", &fixed_time(), "", &[]);
        assert!(doc.ends_with("## File Tree\n\n## Files\n"));
    }

    #[test]
    fn test_repository_name_root() {
        assert_eq!(repository_name(Path::new("/")), "/");
        assert_eq!(repository_name(Path::new("/tmp/project")), "project");
    }
}
