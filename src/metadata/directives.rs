//! Interpretation of `files` and `commands` entries into typed directives.
//!
//! This is the single boundary where dynamically-typed JSON values become
//! strongly-typed directives; everything downstream works on the types here.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};

use super::navigator::DirectiveNode;
use super::shape::{Shape, kind_name};
use crate::error::SchemaError;
use crate::exec::ShellCommand;

/// Mask applied to parsed `mode` values (permission and sticky/setid bits).
const MODE_MASK: u32 = 0o7777;

/// A file to materialize, keyed by its destination path.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDirective {
    /// Destination path.
    pub path: PathBuf,
    /// What to write.
    pub body: FileBody,
    /// Explicit permission bits from the `mode` field, if any.
    pub mode: Option<u32>,
}

/// Where a file's bytes come from.
///
/// `content` wins over `source` when both are present.
#[derive(Debug, Clone, PartialEq)]
pub enum FileBody {
    /// Literal string content.
    Text {
        /// The `content` string as written in the metadata.
        text: String,
        /// How `text` is encoded.
        encoding: Encoding,
    },
    /// Structured content, written as its JSON serialization.
    Structured(Map<String, Value>),
    /// Content downloaded from a URL.
    Remote {
        /// URL with literal quote characters removed.
        url: String,
    },
    /// `content` has a shape that cannot be written.
    Unsupported {
        /// JSON kind of the `content` value.
        found: &'static str,
    },
    /// Neither `content` nor `source` is present.
    Missing,
}

/// Encoding of a string `content` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Written byte-for-byte as UTF-8.
    #[default]
    Plain,
    /// Decoded from standard base64 before writing.
    Base64,
}

/// A command to run, keyed by its identifier.
///
/// A malformed directive is kept (rather than rejected up front) so that it
/// fails at its own position in the sorted execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDirective {
    /// Identifier; directives run in lexicographic order of this value.
    pub id: String,
    /// The interpreted directive, or why it could not be interpreted.
    pub spec: Result<CommandSpec, SchemaError>,
}

/// A well-formed command directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The main command.
    pub run: ShellCommand,
    /// Optional gating check; the main command only runs if it exits 0.
    pub test: Option<ShellCommand>,
}

/// Interpret every entry of a `files` node.
///
/// The result is sorted by path so that runs are reproducible.
///
/// # Errors
///
/// Returns a [`SchemaError`] when an entry is not an object, or when its
/// `source`, `encoding`, or `mode` has the wrong shape.
pub fn parse_files(files: &DirectiveNode<'_>) -> Result<Vec<FileDirective>, SchemaError> {
    let mut directives = files
        .entries()
        .map(|(path, value)| parse_file(files, path, value))
        .collect::<Result<Vec<_>, _>>()?;
    directives.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(directives)
}

fn parse_file(
    files: &DirectiveNode<'_>,
    path: &str,
    value: &Value,
) -> Result<FileDirective, SchemaError> {
    let location = files.child_location(path);
    if value.is_null() {
        return Ok(FileDirective {
            path: PathBuf::from(path),
            body: FileBody::Missing,
            mode: None,
        });
    }
    let Value::Object(map) = value else {
        return Err(SchemaError::new(location, "object", kind_name(value)));
    };
    let entry = DirectiveNode::at(location, map);

    let body = match entry.get("content").map(Shape::of) {
        Some(Shape::Scalar(text)) => FileBody::Text {
            text: text.to_string(),
            encoding: parse_encoding(&entry)?,
        },
        Some(Shape::Object(content)) => FileBody::Structured(content.clone()),
        Some(Shape::Unsupported(found)) => FileBody::Unsupported { found },
        None => match entry.get("source") {
            Some(source) => FileBody::Remote {
                url: require_string(&entry, "source", source)?.replace('"', ""),
            },
            None => FileBody::Missing,
        },
    };

    Ok(FileDirective {
        path: PathBuf::from(path),
        body,
        mode: parse_mode(&entry)?,
    })
}

fn parse_encoding(entry: &DirectiveNode<'_>) -> Result<Encoding, SchemaError> {
    let Some(value) = entry.get("encoding") else {
        return Ok(Encoding::Plain);
    };
    match require_string(entry, "encoding", value)? {
        "plain" => Ok(Encoding::Plain),
        "base64" => Ok(Encoding::Base64),
        _ => Err(SchemaError::new(
            entry.child_location("encoding"),
            "\"plain\" or \"base64\"",
            "another string",
        )),
    }
}

fn parse_mode(entry: &DirectiveNode<'_>) -> Result<Option<u32>, SchemaError> {
    let Some(value) = entry.get("mode") else {
        return Ok(None);
    };
    let digits = require_string(entry, "mode", value)?;
    u32::from_str_radix(digits.trim(), 8)
        .map(|mode| Some(mode & MODE_MASK))
        .map_err(|_| SchemaError::new(entry.child_location("mode"), "octal mode", "string"))
}

/// Interpret every entry of a `commands` node, sorted by identifier.
///
/// Sorting is byte-wise on the identifier and is the only ordering
/// guarantee commands get.
#[must_use]
pub fn parse_commands(commands: &DirectiveNode<'_>) -> Vec<CommandDirective> {
    let mut directives: Vec<CommandDirective> = commands
        .entries()
        .map(|(id, value)| CommandDirective {
            id: id.clone(),
            spec: parse_command(&commands.child_location(id), value),
        })
        .collect();
    directives.sort_by(|a, b| a.id.cmp(&b.id));
    directives
}

fn parse_command(location: &str, value: &Value) -> Result<CommandSpec, SchemaError> {
    match Shape::of(value) {
        Shape::Scalar(script) => Ok(CommandSpec {
            run: ShellCommand::new(script),
            test: None,
        }),
        Shape::Object(map) => {
            let node = DirectiveNode::at(location, map);
            let run = parse_shell_command(&node)?;
            let test = node
                .get("test")
                .map(|test| parse_test(&node.child_location("test"), test))
                .transpose()?;
            Ok(CommandSpec { run, test })
        }
        Shape::Unsupported(found) => Err(SchemaError::new(location, "string or object", found)),
    }
}

/// A `test` takes the same shapes as a command; a nested `test` is ignored.
fn parse_test(location: &str, value: &Value) -> Result<ShellCommand, SchemaError> {
    match Shape::of(value) {
        Shape::Scalar(script) => Ok(ShellCommand::new(script)),
        Shape::Object(map) => parse_shell_command(&DirectiveNode::at(location, map)),
        Shape::Unsupported(found) => Err(SchemaError::new(location, "string or object", found)),
    }
}

fn parse_shell_command(node: &DirectiveNode<'_>) -> Result<ShellCommand, SchemaError> {
    let script = node
        .get("command")
        .ok_or_else(|| SchemaError::new(node.child_location("command"), "string", "nothing"))
        .and_then(|value| require_string(node, "command", value))?;

    let env = node
        .get("env")
        .map(|value| parse_env(node, value))
        .transpose()?;

    let cwd = node
        .get("cwd")
        .map(|value| require_string(node, "cwd", value).map(PathBuf::from))
        .transpose()?;

    Ok(ShellCommand {
        script: script.to_string(),
        env,
        cwd,
    })
}

fn parse_env(
    node: &DirectiveNode<'_>,
    value: &Value,
) -> Result<BTreeMap<String, String>, SchemaError> {
    let location = node.child_location("env");
    let Value::Object(map) = value else {
        return Err(SchemaError::new(location, "object", kind_name(value)));
    };
    let env = DirectiveNode::at(location, map);
    env.entries()
        .map(|(name, value)| {
            require_string(&env, name, value).map(|v| (name.clone(), v.to_string()))
        })
        .collect()
}

fn require_string<'v>(
    node: &DirectiveNode<'_>,
    key: &str,
    value: &'v Value,
) -> Result<&'v str, SchemaError> {
    value
        .as_str()
        .ok_or_else(|| SchemaError::new(node.child_location(key), "string", kind_name(value)))
}
