//! Named stages that apply a config section's directives in order.
pub mod commands;
pub mod context;
pub mod files;

pub use context::Context;

use anyhow::Result;

use crate::metadata::ConfigSection;

/// Counters for a stage that processes many directives.
///
/// # Examples
///
/// ```
/// use meta_init::tasks::TaskStats;
///
/// let stats = TaskStats { applied: 3, skipped: 0 };
/// assert_eq!(stats.summary(), "3 applied");
///
/// let stats = TaskStats { applied: 1, skipped: 2 };
/// assert_eq!(stats.summary(), "1 applied, 2 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of directives applied.
    pub applied: u32,
    /// Number of directives skipped (gating test failed, unsupported content).
    pub skipped: u32,
}

impl TaskStats {
    /// Format the summary string.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.skipped > 0 {
            format!("{} applied, {} skipped", self.applied, self.skipped)
        } else {
            format!("{} applied", self.applied)
        }
    }

}

/// A named, executable stage.
pub trait Task: std::fmt::Debug {
    /// Human-readable stage name, shown as the stage header.
    fn name(&self) -> &str;

    /// Whether this stage has any work.
    fn should_run(&self, ctx: &Context<'_>) -> bool;

    /// Execute the stage and return its counters.
    ///
    /// # Errors
    ///
    /// Returns the first directive failure; directives after it are not run.
    fn run(&self, ctx: &Context<'_>) -> Result<TaskStats>;
}

/// The stages for `config`, in execution order: files, then commands.
///
/// A section that is absent contributes no stage.
#[must_use]
pub fn all_tasks(config: ConfigSection) -> Vec<Box<dyn Task>> {
    let mut tasks: Vec<Box<dyn Task>> = Vec::new();
    if let Some(directives) = config.files {
        tasks.push(Box::new(files::MaterializeFiles::new(directives)));
    }
    if let Some(directives) = config.commands {
        tasks.push(Box::new(commands::RunCommands::new(directives)));
    }
    tasks
}

/// Execute a task, logging its stage header and outcome.
///
/// # Errors
///
/// Returns the task's error, prefixed with the stage name.
pub fn execute(task: &dyn Task, ctx: &Context<'_>) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping stage: {} (nothing to do)", task.name()));
        return Ok(());
    }

    ctx.log.stage(task.name());

    let stats = task
        .run(ctx)
        .map_err(|e| e.context(format!("{} stage failed", task.name())))?;
    ctx.log.info(&stats.summary());
    Ok(())
}
