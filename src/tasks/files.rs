//! Stage that writes every file directive.
use anyhow::Result;

use super::{Context, Task, TaskStats};
use crate::logging::{DirectiveKind, DirectiveStatus};
use crate::metadata::FileDirective;
use crate::resources::file::FileResource;
use crate::resources::{Applicable, ResourceChange};

/// Write every file of `config.files`, stopping at the first failure.
#[derive(Debug)]
pub struct MaterializeFiles {
    files: Vec<FileDirective>,
}

impl MaterializeFiles {
    /// Create the stage for `files`.
    #[must_use]
    pub const fn new(files: Vec<FileDirective>) -> Self {
        Self { files }
    }
}

impl Task for MaterializeFiles {
    fn name(&self) -> &'static str {
        "Files"
    }

    fn should_run(&self, _ctx: &Context<'_>) -> bool {
        !self.files.is_empty()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskStats> {
        let mut stats = TaskStats::default();

        for (index, directive) in self.files.iter().enumerate() {
            let resource = FileResource::new(directive, ctx.fetcher);
            let name = resource.description();

            match resource.apply() {
                Ok(ResourceChange::Applied) => {
                    ctx.log.debug(&format!("wrote {name}"));
                    ctx.log
                        .record(DirectiveKind::File, &name, DirectiveStatus::Applied, None);
                    stats.applied += 1;
                }
                Ok(ResourceChange::Skipped { reason }) => {
                    ctx.log.warn(&format!("skipping file {name}: {reason}"));
                    ctx.log.record(
                        DirectiveKind::File,
                        &name,
                        DirectiveStatus::Skipped,
                        Some(&reason),
                    );
                    stats.skipped += 1;
                }
                Err(e) => {
                    ctx.log.record(
                        DirectiveKind::File,
                        &name,
                        DirectiveStatus::Failed,
                        Some(&e.to_string()),
                    );
                    for rest in self.files.iter().skip(index + 1) {
                        ctx.log.record(
                            DirectiveKind::File,
                            &rest.path.display().to_string(),
                            DirectiveStatus::NotRun,
                            None,
                        );
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(stats)
    }
}
