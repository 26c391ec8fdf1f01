//! Structured logger with per-directive outcome collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::STAGE_TARGET;
use super::types::{DirectiveEntry, DirectiveKind, DirectiveStatus};

/// Logger facade over [`tracing`] that also records the outcome of every
/// directive for the end-of-run summary.
///
/// Console rendering and the optional log file are configured once by
/// [`init_subscriber`](super::subscriber::init_subscriber); without a
/// subscriber the display methods are silent, which keeps library tests quiet.
#[derive(Debug, Default)]
pub struct Logger {
    entries: Mutex<Vec<DirectiveEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// `log_file` is only stored for display in the summary; the file
    /// itself is written by the subscriber's file layer.
    #[must_use]
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (shown on the console only when verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a directive outcome for the summary.
    pub fn record(
        &self,
        kind: DirectiveKind,
        name: &str,
        status: DirectiveStatus,
        message: Option<&str>,
    ) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(DirectiveEntry {
                kind,
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a copy of every recorded outcome, in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<DirectiveEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the directives that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(DirectiveStatus::Failed)
    }

    fn count(&self, status: DirectiveStatus) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard.iter().filter(|e| e.status == status).count()
        })
    }

    /// The totals line of the summary, without colours.
    #[must_use]
    pub fn totals(&self) -> String {
        let total = self.entries.lock().map_or(0, |g| g.len());
        format!(
            "{total} directives: {} applied, {} skipped, {} failed, {} not run",
            self.count(DirectiveStatus::Applied),
            self.count(DirectiveStatus::Skipped),
            self.count(DirectiveStatus::Failed),
            self.count(DirectiveStatus::NotRun),
        )
    }

    /// Print the summary of all recorded directives.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            self.info(&format!("{}{entry}\x1b[0m", entry.status.color()));
        }
        self.info(&self.totals());

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}
