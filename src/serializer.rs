/*!
 * File content capture
 *
 * Walks the same filtered tree as the renderer and turns every surviving
 * file into a `FileRecord`. Nothing below the walk itself can fail the run.
 */

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::filter::{is_directory, Filter};
use crate::types::{FileContent, FileRecord};
use crate::utils::file_name_lossy;

/// Files larger than this are replaced by a placeholder (500 KiB)
pub const MAX_FILE_SIZE: u64 = 500 * 1024;

/// Number of leading bytes inspected for a null byte
pub const BINARY_SAMPLE_SIZE: usize = 1024;

/// Captures file contents below a root directory
pub struct ContentSerializer {
    filter: Arc<Filter>,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl ContentSerializer {
    /// Create a new serializer sharing the run's filter
    pub fn new(filter: Arc<Filter>, progress: Arc<ProgressBar>) -> Self {
        Self { filter, progress }
    }

    /// Relative paths of every surviving file, in output order
    pub fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.filter.excludes_entry(e));

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) if is_directory(&entry) => {}
                Ok(entry) => match entry.path().strip_prefix(root) {
                    Ok(rel) => files.push(rel.to_path_buf()),
                    Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
                },
                Err(e) => {
                    let location = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!("Error reading {}: {}", location, e);
                }
            }
        }

        files
    }

    /// Serialize every surviving file below `root`
    pub fn serialize(&self, root: &Path) -> Vec<FileRecord> {
        let files = self.collect_files(root);
        self.progress.set_length(files.len() as u64);

        files
            .into_par_iter()
            .map(|rel_path| {
                let record = self.process_file(&root.join(&rel_path), rel_path);
                self.progress.inc(1);
                record
            })
            .collect()
    }

    /// Process a single file, converting every failure into a placeholder
    pub fn process_file(&self, abs_path: &Path, rel_path: PathBuf) -> FileRecord {
        let file_name = file_name_lossy(abs_path);
        let display_name = if file_name.chars().count() > 40 {
            let tail: String = file_name.chars().rev().take(37).collect();
            format!("...{}", tail.chars().rev().collect::<String>())
        } else {
            file_name
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        let content = match read_content(abs_path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Failed to read {}: {}", abs_path.display(), e);
                FileContent::Error(e.to_string())
            }
        };

        FileRecord {
            path: rel_path,
            content,
        }
    }
}

/// Apply the size, binary and decoding policy to one file
pub fn read_content(path: &Path) -> io::Result<FileContent> {
    // Opening a FIFO or device would block
    if !fs::metadata(path)?.is_file() {
        return Ok(FileContent::Error("not a regular file".to_string()));
    }

    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    if size > MAX_FILE_SIZE {
        return Ok(FileContent::TooLarge { size });
    }

    let mut buffer = Vec::with_capacity(size as usize);
    file.read_to_end(&mut buffer)?;

    if is_binary(&buffer) {
        return Ok(FileContent::Binary);
    }

    Ok(FileContent::Text(String::from_utf8_lossy(&buffer).into_owned()))
}

/// A null byte in the leading sample marks a file as binary
pub fn is_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_SIZE)];
    sample.contains(&0)
}
