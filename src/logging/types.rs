//! Core logging types: per-directive outcomes recorded for the summary.
use std::fmt;

/// Which stage a recorded directive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// An entry of `config.files`.
    File,
    /// An entry of `config.commands`.
    Command,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Command => "command",
        })
    }
}

/// Outcome of a single directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveStatus {
    /// The file was written or the command ran successfully.
    Applied,
    /// Deliberately not applied (failed `test`, unsupported content).
    Skipped,
    /// The directive failed and stopped its stage.
    Failed,
    /// Not attempted because an earlier directive failed.
    NotRun,
}

impl DirectiveStatus {
    /// Summary icon for this status.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Applied => "✓",
            Self::Skipped => "○",
            Self::Failed => "✗",
            Self::NotRun => "·",
        }
    }

    /// ANSI colour used on the console.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Applied => "\x1b[32m",
            Self::Skipped => "\x1b[33m",
            Self::Failed => "\x1b[31m",
            Self::NotRun => "\x1b[2m",
        }
    }
}

/// A recorded directive outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveEntry {
    /// Stage the directive belongs to.
    pub kind: DirectiveKind,
    /// File path or command identifier.
    pub name: String,
    /// Final status.
    pub status: DirectiveStatus,
    /// Optional detail (skip reason or error).
    pub message: Option<String>,
}

impl fmt::Display for DirectiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.status.icon(), self.kind, self.name)?;
        if let Some(message) = &self.message {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_display_with_message() {
        let entry = DirectiveEntry {
            kind: DirectiveKind::Command,
            name: "10-install".to_string(),
            status: DirectiveStatus::Skipped,
            message: Some("test exited 1".to_string()),
        };
        assert_eq!(entry.to_string(), "○ command 10-install (test exited 1)");
    }

    #[test]
    fn entry_display_without_message() {
        let entry = DirectiveEntry {
            kind: DirectiveKind::File,
            name: "/etc/motd".to_string(),
            status: DirectiveStatus::Applied,
            message: None,
        };
        assert_eq!(entry.to_string(), "✓ file /etc/motd");
    }

    #[test]
    fn statuses_have_distinct_icons() {
        let icons = [
            DirectiveStatus::Applied.icon(),
            DirectiveStatus::Skipped.icon(),
            DirectiveStatus::Failed.icon(),
            DirectiveStatus::NotRun.icon(),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in icons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
