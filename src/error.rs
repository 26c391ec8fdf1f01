//! Domain-specific error types for the metadata interpreter.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`SchemaError`], [`FileError`])
//! while the apply command at the CLI boundary converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! MetaInitError
//! ├── Load(LoadError)        # reading the metadata file or directory
//! ├── Parse(ParseError)      # malformed JSON, non-object root
//! ├── Schema(SchemaError)    # wrong value shape at a directive position
//! ├── File(FileError)        # mkdir, write, chmod, fetch of one file
//! └── Command(CommandError)  # spawn failure or non-zero exit of one command
//! ```
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a metadata run.
///
/// Aggregates the stage-specific errors and is convertible to
/// [`anyhow::Error`] for use at the CLI command boundary.
#[derive(Error, Debug)]
pub enum MetaInitError {
    /// The metadata bytes could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The metadata bytes are not a JSON object.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A directive has the wrong shape.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A file directive could not be materialized.
    #[error(transparent)]
    File(#[from] FileError),

    /// A command directive failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors that arise while reading raw metadata bytes.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A metadata file could not be read.
    #[error("failed to read metadata file {}: {source}", path.display())]
    ReadFile {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The metadata directory could not be listed.
    #[error("failed to read metadata directory {}: {source}", path.display())]
    ReadDirectory {
        /// Path of the unreadable directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The metadata directory holds no regular files.
    #[error("metadata directory {} contains no files", path.display())]
    EmptyDirectory {
        /// Path of the empty directory.
        path: PathBuf,
    },
}

/// Errors that arise while parsing metadata bytes into a document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes are not valid JSON.
    #[error("failed to load JSON metadata{}: {source}", parts_hint(*parts))]
    Json {
        /// Number of files concatenated into the parsed buffer.
        parts: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The document root is valid JSON but not an object.
    #[error("metadata root must be an object, found {found}")]
    RootNotObject {
        /// JSON kind found at the root.
        found: &'static str,
    },
}

fn parts_hint(parts: usize) -> String {
    if parts > 1 {
        format!(" (concatenated from {parts} files)")
    } else {
        String::new()
    }
}

/// A value in the metadata tree does not have the shape its position requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at {location}, found {found}")]
pub struct SchemaError {
    /// Location of the offending value (e.g. `AWS::CloudFormation::Init.config.files`).
    pub location: String,
    /// Shape required at that location.
    pub expected: &'static str,
    /// JSON kind actually found.
    pub found: &'static str,
}

impl SchemaError {
    /// Create a schema error for `location`.
    #[must_use]
    pub fn new(location: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self {
            location: location.into(),
            expected,
            found,
        }
    }
}

/// Errors that arise while materializing one file directive.
#[derive(Error, Debug)]
pub enum FileError {
    /// The parent directory could not be created.
    #[error("failed to create directory {} for {}: {source}", dir.display(), path.display())]
    CreateDir {
        /// File being materialized.
        path: PathBuf,
        /// Directory that could not be created.
        dir: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File being materialized.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Structured content could not be serialized.
    #[error("failed to serialize content for {}: {source}", path.display())]
    Serialize {
        /// File being materialized.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Base64 content could not be decoded.
    #[error("invalid base64 content for {}: {source}", path.display())]
    Decode {
        /// File being materialized.
        path: PathBuf,
        /// Underlying decode error.
        source: base64::DecodeError,
    },

    /// The requested mode could not be applied.
    #[error("failed to set mode {mode:o} on {}: {source}", path.display())]
    Permissions {
        /// File being materialized.
        path: PathBuf,
        /// Requested permission bits.
        mode: u32,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The `source` URL could not be downloaded.
    #[error("failed to fetch {} from {url}: {source}", path.display())]
    Fetch {
        /// File being materialized.
        path: PathBuf,
        /// URL that was requested.
        url: String,
        /// Underlying fetch error.
        source: FetchError,
    },
}

/// Errors that arise while downloading a `source` URL.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or answered with a non-success status.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be streamed to its destination.
    #[error("streaming response body: {0}")]
    Body(#[from] std::io::Error),
}

/// Errors that arise while running one command directive.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The directive (or its `test`, `env`, `cwd`) is malformed.
    #[error("command [{id}] is malformed: {source}")]
    Malformed {
        /// Command identifier.
        id: String,
        /// Shape violation.
        source: SchemaError,
    },

    /// The shell could not be started.
    #[error("command [{id}] could not be started: {source}")]
    Spawn {
        /// Command identifier.
        id: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The shell exited unsuccessfully.
    #[error("command [{id}] failed ({}){}", exit_label(*code), stderr_suffix(stderr))]
    Failed {
        /// Command identifier.
        id: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },
}

fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit {c}"),
    )
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
