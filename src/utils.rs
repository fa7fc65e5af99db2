/*!
 * Utility functions for repo2md
 */

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Replace line breaks in a name so it always fits on one output line.
/// Backslashes are doubled first so distinct names stay distinct.
pub fn escape_line_breaks(name: &str) -> String {
    if !name.contains(['\\', '\n', '\r']) {
        return name.to_string();
    }
    name.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Basename of a path as a lossy string
pub fn file_name_lossy(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(10), "10 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(512_001), "500.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_escape_line_breaks() {
        assert_eq!(escape_line_breaks("plain.rs"), "plain.rs");
        assert_eq!(escape_line_breaks("bad\nname\r"), "bad\\nname\\r");
        assert_eq!(escape_line_breaks("dos\\path"), "dos\\\\path");
        // A real newline and a literal backslash-n must not collide
        assert_eq!(escape_line_breaks("a\\nb"), "a\\\\nb");
        assert_ne!(escape_line_breaks("a\nb"), escape_line_breaks("a\\nb"));
    }

    #[test]
    fn test_file_name_lossy() {
        assert_eq!(file_name_lossy(Path::new("a/b/c.txt")), "c.txt");
        assert_eq!(file_name_lossy(Path::new("/")), "");
    }
}
