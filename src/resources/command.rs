//! Command execution resource.
use super::{Applicable, ResourceChange};
use crate::error::CommandError;
use crate::exec::{ExecResult, Executor};
use crate::metadata::CommandSpec;

/// Runs one well-formed command directive.
///
/// When the directive has a `test`, it runs first; any non-zero exit (or
/// failure to start it) skips the main command without failing the run.
#[derive(Debug)]
pub struct CommandResource<'a> {
    id: &'a str,
    spec: &'a CommandSpec,
    executor: &'a dyn Executor,
}

impl<'a> CommandResource<'a> {
    /// Create a resource for the command `id`.
    #[must_use]
    pub fn new(id: &'a str, spec: &'a CommandSpec, executor: &'a dyn Executor) -> Self {
        Self { id, spec, executor }
    }

    /// Run the gating test. `Some(reason)` means the command must be skipped.
    fn gate(&self) -> Option<String> {
        let test = self.spec.test.as_ref()?;
        match self.executor.run(test) {
            Ok(result) if result.success => {
                self.trace("test", &result);
                None
            }
            Ok(result) => {
                self.trace("test", &result);
                Some(result.code.map_or_else(
                    || "test terminated by signal".to_string(),
                    |code| format!("test exited {code}"),
                ))
            }
            Err(e) => Some(format!("test could not be started: {e}")),
        }
    }

    fn trace(&self, what: &str, result: &ExecResult) {
        let stdout = result.stdout.trim_end();
        if !stdout.is_empty() {
            tracing::debug!("[{}] {what} stdout: {stdout}", self.id);
        }
        let stderr = result.stderr.trim_end();
        if !stderr.is_empty() {
            tracing::debug!("[{}] {what} stderr: {stderr}", self.id);
        }
    }
}

impl Applicable for CommandResource<'_> {
    type Error = CommandError;

    fn description(&self) -> String {
        self.id.to_string()
    }

    fn apply(&self) -> Result<ResourceChange, CommandError> {
        if let Some(reason) = self.gate() {
            return Ok(ResourceChange::Skipped { reason });
        }

        let result = self
            .executor
            .run(&self.spec.run)
            .map_err(|source| CommandError::Spawn {
                id: self.id.to_string(),
                source,
            })?;
        self.trace("command", &result);

        if result.success {
            Ok(ResourceChange::Applied)
        } else {
            Err(CommandError::Failed {
                id: self.id.to_string(),
                code: result.code,
                stderr: result.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::exec::ShellCommand;
    use crate::resources::test_helpers::MockExecutor;

    fn spec(run: &str, test: Option<&str>) -> CommandSpec {
        CommandSpec {
            run: ShellCommand::new(run),
            test: test.map(ShellCommand::new),
        }
    }

    #[test]
    fn successful_command_is_applied() {
        let executor = MockExecutor::new();
        let spec = spec("echo hi", None);
        let change = CommandResource::new("a", &spec, &executor).apply().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(executor.scripts(), vec!["echo hi"]);
    }

    #[test]
    fn failing_command_reports_exit_and_stderr() {
        let executor = MockExecutor::new().exits("exit 1", 1);
        let spec = spec("exit 1", None);
        let err = CommandResource::new("05-second", &spec, &executor)
            .apply()
            .unwrap_err();
        match err {
            CommandError::Failed { id, code, stderr } => {
                assert_eq!(id, "05-second");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "exit 1 failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let executor = MockExecutor::new().cannot_spawn("run");
        let spec = spec("run", None);
        let err = CommandResource::new("a", &spec, &executor).apply().unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn passing_test_runs_command() {
        let executor = MockExecutor::new();
        let spec = spec("install", Some("check"));
        let change = CommandResource::new("a", &spec, &executor).apply().unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(executor.scripts(), vec!["check", "install"]);
    }

    #[test]
    fn failing_test_skips_command() {
        let executor = MockExecutor::new().exits("check", 1);
        let spec = spec("install", Some("check"));
        let change = CommandResource::new("a", &spec, &executor).apply().unwrap();
        assert_eq!(
            change,
            ResourceChange::Skipped {
                reason: "test exited 1".to_string()
            }
        );
        assert_eq!(executor.scripts(), vec!["check"]);
    }

    #[test]
    fn unstartable_test_skips_command() {
        let executor = MockExecutor::new().cannot_spawn("check");
        let spec = spec("install", Some("check"));
        let change = CommandResource::new("a", &spec, &executor).apply().unwrap();
        assert!(matches!(change, ResourceChange::Skipped { .. }));
        assert_eq!(executor.scripts(), vec!["check"]);
    }

    #[test]
    fn test_and_command_carry_their_own_overrides() {
        let executor = MockExecutor::new();
        let spec = CommandSpec {
            run: ShellCommand::new("install").with_env([("A", "1")]),
            test: Some(ShellCommand::new("check").with_cwd("/tmp")),
        };
        CommandResource::new("a", &spec, &executor).apply().unwrap();
        let calls = executor.calls();
        assert_eq!(calls[0].cwd.as_deref(), Some(std::path::Path::new("/tmp")));
        assert!(calls[0].env.is_none());
        assert!(calls[1].env.is_some());
        assert!(calls[1].cwd.is_none());
    }

    #[test]
    fn real_shell_end_to_end() {
        let executor = crate::exec::SystemExecutor::detect();
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let spec = spec(
            &format!("touch '{}'", marker.display()),
            Some(&format!("test ! -e '{}'", marker.display())),
        );
        let resource = CommandResource::new("a", &spec, &executor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert!(marker.exists());
        assert!(matches!(
            resource.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
    }
}
