//! Shared collaborators handed to every task.
use crate::exec::Executor;
use crate::logging::Logger;
use crate::resources::fetch::Fetcher;

/// Shared context for task execution.
pub struct Context<'a> {
    /// Logger for output and directive recording.
    pub log: &'a Logger,
    /// Command executor (for testing or real system calls).
    pub executor: &'a dyn Executor,
    /// Downloader for `source` files (injectable for testing).
    pub fetcher: &'a dyn Fetcher,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &self.log)
            .field("executor", &self.executor)
            .field("fetcher", &"<dyn Fetcher>")
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(log: &'a Logger, executor: &'a dyn Executor, fetcher: &'a dyn Fetcher) -> Self {
        Self {
            log,
            executor,
            fetcher,
        }
    }
}
