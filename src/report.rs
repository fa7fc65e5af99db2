/*!
 * Run summary for repo2md
 *
 * Printed to stderr after the document is written so stdout stays clean.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{FileContent, FileRecord};

/// Number of largest text files listed in the report
const TOP_FILES: usize = 10;

/// Per-file statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Relative path
    pub path: String,
    /// Number of lines
    pub lines: usize,
    /// Number of characters
    pub chars: usize,
}

/// Statistics for one run
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Where the document went
    pub output: String,
    /// Time taken to build and write the document
    pub duration: Duration,
    /// Records with text content
    pub text_files: usize,
    /// Records over the size threshold
    pub too_large: usize,
    /// Records detected as binary
    pub binary: usize,
    /// Records that failed to read
    pub errors: usize,
    /// Total number of lines across text files
    pub total_lines: usize,
    /// Total number of characters across text files
    pub total_chars: usize,
    /// Text files, largest first
    pub file_details: Vec<FileReportInfo>,
    /// Clipboard backend that received the document, if any
    pub clipboard: Option<String>,
}

impl ScanReport {
    /// Tally the records of a finished run
    pub fn from_records(records: &[FileRecord], output: String, duration: Duration) -> Self {
        let mut report = Self {
            output,
            duration,
            ..Self::default()
        };

        for record in records {
            match &record.content {
                FileContent::Text(text) => {
                    let info = FileReportInfo {
                        path: record.display_path(),
                        lines: text.lines().count(),
                        chars: text.chars().count(),
                    };
                    report.text_files += 1;
                    report.total_lines += info.lines;
                    report.total_chars += info.chars;
                    report.file_details.push(info);
                }
                FileContent::TooLarge { .. } => report.too_large += 1,
                FileContent::Binary => report.binary += 1,
                FileContent::Error(_) => report.errors += 1,
            }
        }

        report
            .file_details
            .sort_by(|a, b| b.chars.cmp(&a.chars).then_with(|| a.path.cmp(&b.path)));
        report
    }

    /// Total number of file blocks in the document
    pub fn files_included(&self) -> usize {
        self.text_files + self.too_large + self.binary + self.errors
    }
}

/// Report generator for run results
pub struct Reporter;

impl Reporter {
    /// Format a number with human-readable units
    fn format_number(num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Keep the tail of long paths readable
    fn truncate_path(path: &str, max_len: usize) -> String {
        let count = path.chars().count();
        if count <= max_len {
            return path.to_string();
        }
        let tail: String = path.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output",
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Included",
                value: Self::format_number(report.files_included()),
            },
            SummaryRow {
                key: "🚫 Skipped (large / binary / error)",
                value: format!("{} / {} / {}", report.too_large, report.binary, report.errors),
            },
            SummaryRow {
                key: "📝 Total Lines",
                value: Self::format_number(report.total_lines),
            },
            SummaryRow {
                key: "📦 LLM Tokens",
                value: format!(
                    "{} tokens (estimated)",
                    Self::format_number(report.total_chars / 4)
                ),
            },
        ];

        if let Some(backend) = &report.clipboard {
            rows.push(SummaryRow {
                key: "📋 Clipboard",
                value: backend.clone(),
            });
        }

        Self::styled(Table::new(rows))
    }

    fn create_files_table(report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let rows: Vec<FileRow> = report
            .file_details
            .iter()
            .take(TOP_FILES)
            .map(|info| FileRow {
                path: Self::truncate_path(&info.path, 60),
                lines: Self::format_number(info.lines),
                tokens: Self::format_number(info.chars / 4),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    /// Render the full report
    pub fn generate_report(report: &ScanReport) -> String {
        let files_title = if report.file_details.len() > TOP_FILES {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT"
        } else {
            "📋  PROCESSED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            Self::create_files_table(report),
            "✅  CONVERSION COMPLETE",
            Self::create_summary_table(report)
        )
    }

    /// Print the report to stderr
    pub fn print_report(report: &ScanReport) {
        eprintln!("\n{}", Self::generate_report(report));
    }
}
