//! Archive decoding into uploadable entries.

use std::io::{Cursor, Read};

use thiserror::Error;
use tracing::warn;

/// Errors raised while decoding an archive payload.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("corrupt or unreadable archive: {0}")]
    Corrupt(String),
}

/// One file extracted from the archive, identified by its relative path.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Relative path inside the archive, forward-slash separated.
    pub path: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// Final path segment, used as the destination when directory structure
    /// is not preserved.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Decodes zip bytes into file entries, in archive order.
///
/// Directory entries are dropped, as are entries whose names would escape
/// the archive root — the returned count only covers writable files.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ArchiveError::Corrupt(e.to_string()))?;

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| ArchiveError::Corrupt(e.to_string()))?;
        if file.is_dir() {
            continue;
        }
        let path = match file.enclosed_name() {
            Some(name) => name.to_string_lossy().replace('\\', "/"),
            None => {
                warn!(name = %file.name(), "skipping archive entry with unsafe path");
                continue;
            }
        };

        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)
            .map_err(|e| ArchiveError::Corrupt(format!("failed to read '{}': {}", path, e)))?;

        entries.push(ArchiveEntry { path, content });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), options)
                    .unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_files_in_archive_order() {
        let bytes = build_zip(&[
            ("README.md", b"hello".as_slice()),
            ("src/main.rs", b"fn main() {}".as_slice()),
            ("assets/logo.svg", b"<svg/>".as_slice()),
        ]);

        let entries = read_entries(&bytes).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["README.md", "src/main.rs", "assets/logo.svg"]);
        assert_eq!(entries[0].content, b"hello");
        assert_eq!(entries[1].content, b"fn main() {}");
    }

    #[test]
    fn test_directory_entries_are_dropped() {
        let bytes = build_zip(&[
            ("docs/", b"".as_slice()),
            ("docs/guide.md", b"# Guide".as_slice()),
            ("empty-dir/", b"".as_slice()),
        ]);

        let entries = read_entries(&bytes).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "docs/guide.md");
    }

    #[test]
    fn test_corrupt_bytes_fail() {
        let result = read_entries(b"definitely not a zip archive");
        assert!(matches!(result, Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn test_empty_archive_yields_no_entries() {
        let bytes = build_zip(&[]);
        let entries = read_entries(&bytes).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_file_name_is_final_segment() {
        let entry = ArchiveEntry {
            path: "a/b/c.txt".to_string(),
            content: vec![],
        };
        assert_eq!(entry.file_name(), "c.txt");

        let flat = ArchiveEntry {
            path: "top.txt".to_string(),
            content: vec![],
        };
        assert_eq!(flat.file_name(), "top.txt");
    }
}
