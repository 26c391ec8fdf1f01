//! Stage that runs command directives in identifier order.
use anyhow::Result;

use super::{Context, Task, TaskStats};
use crate::error::CommandError;
use crate::logging::{DirectiveKind, DirectiveStatus};
use crate::metadata::CommandDirective;
use crate::resources::command::CommandResource;
use crate::resources::{Applicable, ResourceChange};

/// Run every command of `config.commands`, sorted by identifier.
///
/// A failing `test` skips its command and moves on. A failing command, or
/// a malformed one, ends the stage: later identifiers never run.
#[derive(Debug)]
pub struct RunCommands {
    commands: Vec<CommandDirective>,
}

impl RunCommands {
    /// Create the stage for `commands`, which must already be sorted.
    #[must_use]
    pub const fn new(commands: Vec<CommandDirective>) -> Self {
        Self { commands }
    }

    fn run_one(
        directive: &CommandDirective,
        ctx: &Context<'_>,
    ) -> Result<ResourceChange, CommandError> {
        let spec = directive
            .spec
            .as_ref()
            .map_err(|source| CommandError::Malformed {
                id: directive.id.clone(),
                source: source.clone(),
            })?;
        ctx.log.info(&format!("running command [{}]", directive.id));
        CommandResource::new(&directive.id, spec, ctx.executor).apply()
    }
}

impl Task for RunCommands {
    fn name(&self) -> &'static str {
        "Commands"
    }

    fn should_run(&self, _ctx: &Context<'_>) -> bool {
        !self.commands.is_empty()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskStats> {
        let mut stats = TaskStats::default();

        for (index, directive) in self.commands.iter().enumerate() {
            let id = directive.id.as_str();

            match Self::run_one(directive, ctx) {
                Ok(ResourceChange::Applied) => {
                    ctx.log
                        .record(DirectiveKind::Command, id, DirectiveStatus::Applied, None);
                    stats.applied += 1;
                }
                Ok(ResourceChange::Skipped { reason }) => {
                    ctx.log.warn(&format!(
                        "command [{id}] skipped due to test result ({reason})"
                    ));
                    ctx.log.record(
                        DirectiveKind::Command,
                        id,
                        DirectiveStatus::Skipped,
                        Some(&reason),
                    );
                    stats.skipped += 1;
                }
                Err(e) => {
                    ctx.log.record(
                        DirectiveKind::Command,
                        id,
                        DirectiveStatus::Failed,
                        Some(&e.to_string()),
                    );
                    for rest in self.commands.iter().skip(index + 1) {
                        ctx.log.record(
                            DirectiveKind::Command,
                            &rest.id,
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

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::exec::ShellCommand;
    use crate::metadata::CommandSpec;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::TestEnv;

    fn command(id: &str, run: &str, test: Option<&str>) -> CommandDirective {
        CommandDirective {
            id: id.to_string(),
            spec: Ok(CommandSpec {
                run: ShellCommand::new(run),
                test: test.map(ShellCommand::new),
            }),
        }
    }

    fn malformed(id: &str) -> CommandDirective {
        CommandDirective {
            id: id.to_string(),
            spec: Err(SchemaError::new(id, "string or object", "number")),
        }
    }

    fn statuses(env: &TestEnv) -> Vec<(String, DirectiveStatus)> {
        env.log
            .entries()
            .into_iter()
            .map(|e| (e.name, e.status))
            .collect()
    }

    #[test]
    fn runs_in_given_order() {
        let env = TestEnv::new();
        let task = RunCommands::new(vec![
            command("01", "first", None),
            command("02", "second", None),
            command("10", "third", None),
        ]);
        task.run(&env.ctx()).unwrap();
        assert_eq!(env.executor.scripts(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failure_stops_later_commands() {
        let env = TestEnv::with_executor(MockExecutor::new().exits("exit 1", 1));
        let task = RunCommands::new(vec![
            command("05-second", "exit 1", None),
            command("10-first", "echo hi", None),
        ]);
        let err = task.run(&env.ctx()).unwrap_err();
        assert!(err.to_string().contains("[05-second]"));
        assert_eq!(env.executor.scripts(), vec!["exit 1"]);
        assert_eq!(
            statuses(&env),
            vec![
                ("05-second".to_string(), DirectiveStatus::Failed),
                ("10-first".to_string(), DirectiveStatus::NotRun),
            ]
        );
    }

    #[test]
    fn failed_test_skips_only_that_command() {
        let env = TestEnv::with_executor(MockExecutor::new().exits("false", 1));
        let task = RunCommands::new(vec![
            command("a", "install", Some("false")),
            command("b", "configure", None),
        ]);
        assert_eq!(
            task.run(&env.ctx()).unwrap(),
            TaskStats {
                applied: 1,
                skipped: 1
            }
        );
        assert_eq!(env.executor.scripts(), vec!["false", "configure"]);
        let entries = env.log.entries();
        assert_eq!(entries[0].status, DirectiveStatus::Skipped);
        assert_eq!(entries[0].message.as_deref(), Some("test exited 1"));
        assert_eq!(entries[1].status, DirectiveStatus::Applied);
    }

    #[test]
    fn malformed_command_fails_at_its_position() {
        let env = TestEnv::new();
        let task = RunCommands::new(vec![
            command("a", "before", None),
            malformed("b"),
            command("c", "after", None),
        ]);
        let err = task.run(&env.ctx()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::Malformed { id, .. }) if id == "b"
        ));
        assert_eq!(env.executor.scripts(), vec!["before"]);
        assert_eq!(
            statuses(&env),
            vec![
                ("a".to_string(), DirectiveStatus::Applied),
                ("b".to_string(), DirectiveStatus::Failed),
                ("c".to_string(), DirectiveStatus::NotRun),
            ]
        );
    }

    #[test]
    fn spawn_failure_is_fatal() {
        let env = TestEnv::with_executor(MockExecutor::new().cannot_spawn("x"));
        let task = RunCommands::new(vec![command("a", "x", None), command("b", "y", None)]);
        let err = task.run(&env.ctx()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::Spawn { .. })
        ));
        assert_eq!(env.executor.scripts(), vec!["x"]);
    }
}
