//! Reading raw metadata bytes from a file or a directory of parts.
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Where the metadata document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    /// A single JSON document.
    File(PathBuf),
    /// A directory whose regular files are concatenated, in file-name order,
    /// into one buffer before parsing.
    Directory(PathBuf),
}

impl MetadataSource {
    /// Path of the file or directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

/// Raw metadata bytes and the number of files they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    /// Concatenated file contents.
    pub bytes: Vec<u8>,
    /// Number of files that contributed to `bytes`.
    pub parts: usize,
}

/// Read the raw bytes for `source`.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file or directory cannot be read, or if a
/// directory contains no regular files.
pub fn read(source: &MetadataSource) -> Result<RawMetadata, LoadError> {
    match source {
        MetadataSource::File(path) => read_file(path).map(|bytes| RawMetadata { bytes, parts: 1 }),
        MetadataSource::Directory(dir) => read_directory(dir),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Concatenate every regular file in `dir`, sorted by file name.
///
/// Subdirectories are ignored. The bytes are joined as-is; more than one
/// part only parses if the parts together form a single JSON value.
fn read_directory(dir: &Path) -> Result<RawMetadata, LoadError> {
    let listing_error = |source| LoadError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_error)? {
        let path = entry.map_err(listing_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if files.is_empty() {
        return Err(LoadError::EmptyDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut bytes = Vec::new();
    for path in &files {
        bytes.extend(read_file(path)?);
    }
    Ok(RawMetadata {
        bytes,
        parts: files.len(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        std::fs::write(&path, "{}").unwrap();
        let raw = read(&MetadataSource::File(path)).unwrap();
        assert_eq!(raw.bytes, b"{}");
        assert_eq!(raw.parts, 1);
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&MetadataSource::File(dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, LoadError::ReadFile { .. }));
    }

    #[test]
    fn directory_parts_are_concatenated_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("20-tail"), "}}").unwrap();
        std::fs::write(dir.path().join("10-head"), "{\"a\": {").unwrap();
        std::fs::create_dir(dir.path().join("00-subdir")).unwrap();
        let raw = read(&MetadataSource::Directory(dir.path().to_path_buf())).unwrap();
        assert_eq!(raw.bytes, b"{\"a\": {}}");
        assert_eq!(raw.parts, 2);
    }

    #[test]
    fn empty_directory_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&MetadataSource::Directory(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, LoadError::EmptyDirectory { .. }));
    }

    #[test]
    fn missing_directory_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&MetadataSource::Directory(dir.path().join("nope"))).unwrap_err();
        assert!(matches!(err, LoadError::ReadDirectory { .. }));
    }

    #[test]
    fn source_path_accessor() {
        let source = MetadataSource::Directory(PathBuf::from("/var/lib/meta"));
        assert_eq!(source.path(), Path::new("/var/lib/meta"));
    }
}
