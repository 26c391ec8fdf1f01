//! Command: apply a metadata document to the local machine.
use std::time::Duration;

use anyhow::Result;

use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::metadata::{MetadataDocument, MetadataSource};
use crate::resources::fetch::HttpFetcher;
use crate::tasks::{self, Context};

/// Everything the apply command needs, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOpts {
    /// Where to read the metadata from.
    pub source: MetadataSource,
    /// Overall timeout for each `source` download; `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

/// Run the apply command with the system shell and an HTTP fetcher, then
/// print the directive summary.
///
/// # Errors
///
/// Returns the first fatal error: unreadable or malformed metadata, a file
/// that cannot be written, or a command that fails.
pub fn run(opts: &ApplyOpts, log: &Logger) -> Result<()> {
    let executor = SystemExecutor::detect();
    log.debug(&format!("shell: {}", executor.shell().display()));
    let fetcher = HttpFetcher::new(opts.fetch_timeout);
    let ctx = Context::new(log, &executor, &fetcher);

    let result = apply(&opts.source, &ctx);
    log.print_summary();
    result
}

/// Load the document from `source` and apply it.
///
/// # Errors
///
/// See [`run`].
pub fn apply(source: &MetadataSource, ctx: &Context<'_>) -> Result<()> {
    ctx.log.stage("Loading metadata");
    let document = MetadataDocument::load(source)?;
    ctx.log.info(&format!("loaded {}", source.path().display()));
    apply_document(&document, ctx)
}

/// Apply the `config` section of `document`: files first, then commands.
///
/// The whole section is interpreted before anything is written, so a
/// malformed container or file entry has no side effects.
///
/// # Errors
///
/// Returns a schema error for a malformed section, or the first stage failure.
/// A failed file stage stops the run before any command starts.
pub fn apply_document(document: &MetadataDocument, ctx: &Context<'_>) -> Result<()> {
    let Some(config) = document.config()? else {
        ctx.log.info("no AWS::CloudFormation::Init config section; nothing to do");
        return Ok(());
    };
    if config.is_empty() {
        ctx.log.info("config section has no files or commands; nothing to do");
        return Ok(());
    }

    for task in tasks::all_tasks(config) {
        tasks::execute(task.as_ref(), ctx)?;
    }
    Ok(())
}
