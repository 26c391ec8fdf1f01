//! Shell command execution.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Fallback shell when `sh` cannot be found on `PATH`.
const DEFAULT_SHELL: &str = "/bin/sh";

/// A shell command line together with its process overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Script passed to `sh -c`.
    pub script: String,
    /// Complete child environment. When set, the parent environment is
    /// *not* inherited: the child sees exactly these variables.
    pub env: Option<BTreeMap<String, String>>,
    /// Working directory of the child.
    pub cwd: Option<PathBuf>,
}

impl ShellCommand {
    /// A command with no overrides.
    #[must_use]
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            env: None,
            cwd: None,
        }
    }

    /// Replace the child environment with `env`.
    #[must_use]
    pub fn with_env<K, V>(mut self, env: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Run the child in `cwd`.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs shell commands synchronously.
///
/// A non-zero exit is reported through [`ExecResult::success`], not as an
/// error; only a failure to start the process is an `Err`.
pub trait Executor: std::fmt::Debug {
    /// Run `command` through the shell and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the shell cannot be spawned.
    fn run(&self, command: &ShellCommand) -> std::io::Result<ExecResult>;
}

/// [`Executor`] backed by the system shell (`sh -c <script>`).
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    shell: PathBuf,
}

impl SystemExecutor {
    /// Resolve `sh` on the current `PATH` once, falling back to `/bin/sh`.
    ///
    /// The shell path is fixed up front so that commands whose environment
    /// is replaced (and therefore have no `PATH`) still start.
    #[must_use]
    pub fn detect() -> Self {
        let shell = which::which("sh").unwrap_or_else(|_| PathBuf::from(DEFAULT_SHELL));
        Self { shell }
    }

    /// Use a specific shell binary.
    #[must_use]
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Path of the shell used for every command.
    #[must_use]
    pub fn shell(&self) -> &Path {
        &self.shell
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::detect()
    }
}

impl Executor for SystemExecutor {
    fn run(&self, command: &ShellCommand) -> std::io::Result<ExecResult> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&command.script);
        if let Some(env) = &command.env {
            cmd.env_clear().envs(env);
        }
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }
        cmd.output().map(ExecResult::from)
    }
}
