//! Command-line interface definition.
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::commands::apply::ApplyOpts;
use crate::commands::version::VERSION;
use crate::metadata::MetadataSource;

/// Apply CloudFormation::Init style metadata to the local machine.
///
/// Writes the files described under `config.files`, then runs
/// `config.commands` in identifier order.
#[derive(Parser, Debug)]
#[command(name = "meta-init", version = VERSION)]
pub struct Cli {
    /// Metadata source selection
    #[command(flatten)]
    pub source: SourceArgs,

    /// Enable verbose output (command output, per-file detail)
    #[arg(short, long)]
    pub verbose: bool,

    /// Also append every log line to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Give up on each `source` download after this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub fetch_timeout: Option<u64>,
}

/// Where the metadata comes from; exactly one must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Read the metadata from a single JSON file
    #[arg(long, value_name = "FILE")]
    pub meta_file: Option<PathBuf>,

    /// Read the metadata from every file in a directory, joined in name order
    #[arg(long, value_name = "DIR")]
    pub meta_directory: Option<PathBuf>,
}

impl SourceArgs {
    /// The selected source. `None` only if clap's group check was bypassed.
    #[must_use]
    pub fn source(&self) -> Option<MetadataSource> {
        match (&self.meta_file, &self.meta_directory) {
            (Some(file), None) => Some(MetadataSource::File(file.clone())),
            (None, Some(dir)) => Some(MetadataSource::Directory(dir.clone())),
            _ => None,
        }
    }
}

impl Cli {
    /// Build the apply configuration from the parsed flags.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one metadata source was given.
    pub fn apply_opts(&self) -> anyhow::Result<ApplyOpts> {
        let source = self.source.source().ok_or_else(|| {
            anyhow::anyhow!("exactly one of --meta-file or --meta-directory is required")
        })?;
        Ok(ApplyOpts {
            source,
            fetch_timeout: self.fetch_timeout.map(Duration::from_secs),
        })
    }
}
