// Shared helpers for integration tests.
//
// Provides a temporary directory that holds both the metadata document and
// everything the directives write, so each test runs in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use meta_init::commands::apply::{self, ApplyOpts};
use meta_init::logging::Logger;
use meta_init::metadata::MetadataSource;
use serde_json::{Map, Value, json};

/// An isolated workspace backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory; deleted on drop.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Absolute path of `rel` inside the workspace.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// `rel` as a string, for use as a `files` key or inside a command.
    pub fn path_str(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    /// Write `document` to `meta.json` and return its path.
    pub fn write_metadata(&self, document: &Value) -> PathBuf {
        let path = self.path("meta.json");
        std::fs::write(&path, document.to_string()).expect("write metadata");
        path
    }

    /// Run the library apply command against `document`.
    pub fn apply(&self, document: &Value) -> (anyhow::Result<()>, Logger) {
        let opts = ApplyOpts {
            source: MetadataSource::File(self.write_metadata(document)),
            fetch_timeout: None,
        };
        let log = Logger::new(None);
        let result = apply::run(&opts, &log);
        (result, log)
    }

    /// Run the compiled binary with `args`, from inside the workspace.
    pub fn run_binary(&self, args: &[&str]) -> Output {
        self.binary().args(args).output().expect("run meta-init")
    }

    /// A [`Command`] for the compiled binary, running in the workspace.
    pub fn binary(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_meta-init"));
        cmd.current_dir(self.root.path());
        cmd
    }

    /// Read a file written by a directive.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read output file")
    }

    /// Whether `rel` exists in the workspace.
    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// The workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}

/// Fluent builder for a metadata document with a `config` section.
#[derive(Default)]
pub struct MetadataBuilder {
    files: Map<String, Value>,
    commands: Map<String, Value>,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `files` entry.
    pub fn file(mut self, path: impl Into<String>, entry: Value) -> Self {
        self.files.insert(path.into(), entry);
        self
    }

    /// Add a `commands` entry.
    pub fn command(mut self, id: &str, entry: Value) -> Self {
        self.commands.insert(id.to_string(), entry);
        self
    }

    /// The finished document. Empty sections are left out.
    pub fn build(self) -> Value {
        let mut config = Map::new();
        if !self.files.is_empty() {
            config.insert("files".to_string(), Value::Object(self.files));
        }
        if !self.commands.is_empty() {
            config.insert("commands".to_string(), Value::Object(self.commands));
        }
        json!({"AWS::CloudFormation::Init": {"config": config}})
    }
}
