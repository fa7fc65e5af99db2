/*!
 * Splits a generated document back into per-file records
 *
 * Block bodies are consumed by the byte length recorded in the START
 * sentinel, so content that itself contains sentinels, headings or code
 * fences is recovered verbatim.
 */

use crate::error::{Repo2MdError, Result};
use crate::types::FileContent;
use crate::writer::{
    END_MARKER, FILES_HEADING, GENERATED_PREFIX, MARKER_SUFFIX, START_MARKER, TITLE_PREFIX,
    TREE_HEADING,
};

/// A document split back into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Repository name from the title line
    pub name: String,
    /// Generation timestamp as written
    pub generated_at: String,
    /// Raw tree section, without surrounding blank lines
    pub tree: String,
    /// `(relative path, content)` pairs in document order
    pub files: Vec<(String, FileContent)>,
}

impl ParsedDocument {
    /// Relative file paths listed in the tree section
    pub fn tree_paths(&self) -> Vec<String> {
        tree_file_paths(&self.tree)
    }
}

/// Parse a complete document
pub fn parse_document(doc: &str) -> Result<ParsedDocument> {
    let mut cursor = Cursor::new(doc);

    let name = cursor
        .line()?
        .strip_prefix(TITLE_PREFIX)
        .ok_or_else(|| parse_error(0, "missing title line"))?
        .to_string();
    cursor.expect_line("")?;

    let generated_at = cursor
        .line()?
        .strip_prefix(GENERATED_PREFIX)
        .and_then(|rest| rest.strip_suffix('*'))
        .ok_or_else(|| parse_error(cursor.pos, "missing timestamp line"))?
        .to_string();
    cursor.expect_line("")?;
    cursor.expect_line(TREE_HEADING)?;
    cursor.expect_line("")?;

    let mut tree_lines = Vec::new();
    loop {
        let line = cursor.line()?;
        if line == FILES_HEADING {
            break;
        }
        tree_lines.push(line);
    }
    while tree_lines.last() == Some(&"") {
        tree_lines.pop();
    }

    let mut files = Vec::new();
    while !cursor.is_done() {
        let line = cursor.line()?;
        if line.is_empty() {
            continue;
        }
        files.push(cursor.block(line)?);
    }

    Ok(ParsedDocument {
        name,
        generated_at,
        tree: tree_lines.join("\n"),
        files,
    })
}

/// Reconstruct relative file paths from an indented tree
pub fn tree_file_paths(tree: &str) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    let mut paths = Vec::new();

    for line in tree.lines() {
        let trimmed = line.trim_start_matches(' ');
        let depth = (line.len() - trimmed.len()) / 2;
        stack.truncate(depth);

        if let Some(dir) = trimmed.strip_prefix("- 📂 ") {
            stack.push(dir.trim_end_matches('/').to_string());
        } else if let Some(file) = trimmed.strip_prefix("- 📄 ") {
            let mut parts = stack.clone();
            parts.push(file.to_string());
            paths.push(parts.join("/"));
        }
    }

    paths
}

struct Cursor<'a> {
    doc: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(doc: &'a str) -> Self {
        Self { doc, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.doc.len()
    }

    /// Next line without its terminator
    fn line(&mut self) -> Result<&'a str> {
        if self.is_done() {
            return Err(parse_error(self.pos, "unexpected end of document"));
        }
        let doc = self.doc;
        let rest = &doc[self.pos..];
        match rest.find('\n') {
            Some(idx) => {
                self.pos += idx + 1;
                Ok(&rest[..idx])
            }
            None => {
                self.pos = self.doc.len();
                Ok(rest)
            }
        }
    }

    fn expect_line(&mut self, expected: &str) -> Result<()> {
        let start = self.pos;
        let line = self.line()?;
        if line != expected {
            return Err(parse_error(
                start,
                &format!("expected {:?}, found {:?}", expected, line),
            ));
        }
        Ok(())
    }

    /// Consume one block whose START line has already been read
    fn block(&mut self, header: &str) -> Result<(String, FileContent)> {
        let start = self.pos;
        let (path, kind, len) = parse_header(header).ok_or_else(|| {
            parse_error(start, &format!("malformed block header {:?}", header))
        })?;

        let doc = self.doc;
        let body = self
            .pos
            .checked_add(len)
            .and_then(|end| doc.get(self.pos..end))
            .ok_or_else(|| parse_error(start, &format!("body of {} overruns document", path)))?;
        self.pos += len;

        self.expect_line("")?;
        self.expect_line(&format!("{}{}{}", END_MARKER, path, MARKER_SUFFIX))?;

        let content = decode_body(kind, body)
            .ok_or_else(|| parse_error(start, &format!("unknown block kind {:?}", kind)))?;
        Ok((path.to_string(), content))
    }
}

/// Split `<<< START FILE: path [kind, n bytes] >>>` into its fields
fn parse_header(line: &str) -> Option<(&str, &str, usize)> {
    let inner = line.strip_prefix(START_MARKER)?.strip_suffix(MARKER_SUFFIX)?;
    let open = inner.rfind(" [")?;
    let (path, meta) = (&inner[..open], &inner[open + 2..]);
    let meta = meta.strip_suffix(" bytes]")?;
    let (kind, len) = meta.split_once(", ")?;
    Some((path, kind, len.parse().ok()?))
}

fn decode_body(kind: &str, body: &str) -> Option<FileContent> {
    match kind {
        "text" => Some(FileContent::Text(body.to_string())),
        "binary" => Some(FileContent::Binary),
        "error" => {
            let description = body
                .strip_prefix("*Error reading file: ")
                .and_then(|rest| rest.strip_suffix('*'))
                .unwrap_or(body);
            Some(FileContent::Error(description.to_string()))
        }
        "too-large" => {
            let size = body
                .strip_suffix(" bytes)*")
                .and_then(|rest| rest.rsplit(", ").next())
                .and_then(|n| n.parse().ok())?;
            Some(FileContent::TooLarge { size })
        }
        _ => None,
    }
}

fn parse_error(pos: usize, message: &str) -> Repo2MdError {
    Repo2MdError::Parse(format!("at byte {}: {}", pos, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use crate::writer::assemble;
    use chrono::Local;
    use std::path::PathBuf;

    fn record(path: &str, content: FileContent) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            content,
        }
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("<<< START FILE: src/a [b].rs [text, 12 bytes] >>>"),
            Some(("src/a [b].rs", "text", 12))
        );
        assert_eq!(parse_header("<<< START FILE: x [text] >>>"), None);
        assert_eq!(parse_header("## src/a.rs"), None);
    }

    #[test]
    fn test_hostile_content_survives() {
        let hostile = concat!(
            "## some/path\n",
            "```\n",
            "<<< END FILE: notes.md >>>\n",
            "<<< START FILE: fake.txt [text, 3 bytes] >>>\n",
            "```"
        );
        let records = vec![
            record("notes.md", FileContent::Text(hostile.to_string())),
            record("z.txt", FileContent::Text(String::new())),
        ];
        let doc = assemble("repo", &Local::now(), "- 📄 notes.md\n- 📄 z.txt", &records);

        let parsed = parse_document(&doc).unwrap();
        assert_eq!(parsed.name, "repo");
        assert_eq!(
            parsed.files,
            vec![
                ("notes.md".to_string(), FileContent::Text(hostile.to_string())),
                ("z.txt".to_string(), FileContent::Text(String::new())),
            ]
        );
    }

    #[test]
    fn test_placeholders_round_trip() {
        let records = vec![
            record("big.bin", FileContent::TooLarge { size: 600_000 }),
            record("img.png", FileContent::Binary),
            record("locked.txt", FileContent::Error("Permission denied (os error 13)".into())),
        ];
        let doc = assemble("repo", &Local::now(), "", &records);

        let parsed = parse_document(&doc).unwrap();
        let expected: Vec<_> = records
            .into_iter()
            .map(|r| (r.display_path(), r.content))
            .collect();
        assert_eq!(parsed.files, expected);
        assert_eq!(parsed.tree, "");
    }

    #[test]
    fn test_mismatched_end_marker_rejected() {
        let doc = concat!(
            "# Repository: r\n\n*Generated on: now*\n\n## File Tree\n\n## Files\n\n",
            "<<< START FILE: a.txt [text, 2 bytes] >>>\nhi\n<<< END FILE: b.txt >>>\n"
        );
        assert!(matches!(parse_document(doc), Err(Repo2MdError::Parse(_))));
    }

    #[test]
    fn test_overrun_rejected() {
        let doc = concat!(
            "# Repository: r\n\n*Generated on: now*\n\n## File Tree\n\n## Files\n\n",
            "<<< START FILE: a.txt [text, 999 bytes] >>>\nhi\n"
        );
        assert!(matches!(parse_document(doc), Err(Repo2MdError::Parse(_))));
    }

    #[test]
    fn test_tree_file_paths() {
        let tree = "- 📄 README.md\n- 📂 src/\n  - 📂 bin/\n    - 📄 main.rs\n  - 📄 lib.rs\n- 📄 z.txt";
        assert_eq!(
            tree_file_paths(tree),
            vec!["README.md", "src/bin/main.rs", "src/lib.rs", "z.txt"]
        );
    }
}
