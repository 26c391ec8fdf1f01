//! Loading and interpreting the metadata document.
//!
//! The pipeline is one-directional: [`loader`] produces raw bytes,
//! [`MetadataDocument::parse`] turns them into a JSON tree, [`navigator`]
//! walks down to the `config` section, and [`directives`] converts its
//! `files` and `commands` entries into typed directives.
pub mod directives;
pub mod loader;
pub mod navigator;
pub mod shape;

pub use directives::{CommandDirective, CommandSpec, Encoding, FileBody, FileDirective};
pub use loader::{MetadataSource, RawMetadata};
pub use navigator::DirectiveNode;
pub use shape::Shape;

use serde_json::Value;

use crate::error::{MetaInitError, ParseError, SchemaError};
use shape::kind_name;

/// Top-level key of the init metadata.
pub const INIT_KEY: &str = "AWS::CloudFormation::Init";
/// Config set under [`INIT_KEY`].
pub const CONFIG_KEY: &str = "config";
/// Files section of the config set.
pub const FILES_KEY: &str = "files";
/// Commands section of the config set.
pub const COMMANDS_KEY: &str = "commands";

/// A parsed metadata document whose root is known to be an object.
#[derive(Debug, Clone)]
pub struct MetadataDocument {
    root: Value,
}

/// The interpreted `config` section.
///
/// `None` means the section is absent, which is not an error.
#[derive(Debug, Clone, Default)]
pub struct ConfigSection {
    /// Directives from `config.files`.
    pub files: Option<Vec<FileDirective>>,
    /// Directives from `config.commands`, sorted by identifier.
    pub commands: Option<Vec<CommandDirective>>,
}

impl ConfigSection {
    /// Whether the section holds neither files nor commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.as_ref().is_none_or(Vec::is_empty)
            && self.commands.as_ref().is_none_or(Vec::is_empty)
    }
}

impl MetadataDocument {
    /// Read and parse the document described by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`MetaInitError::Load`] if the bytes cannot be read and
    /// [`MetaInitError::Parse`] if they are not a JSON object.
    pub fn load(source: &MetadataSource) -> Result<Self, MetaInitError> {
        let raw = loader::read(source)?;
        Ok(Self::parse_parts(&raw.bytes, raw.parts)?)
    }

    /// Parse a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed JSON or a non-object root.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        Self::parse_parts(bytes, 1)
    }

    fn parse_parts(bytes: &[u8], parts: usize) -> Result<Self, ParseError> {
        let root: Value =
            serde_json::from_slice(bytes).map_err(|source| ParseError::Json { parts, source })?;
        if !root.is_object() {
            return Err(ParseError::RootNotObject {
                found: kind_name(&root),
            });
        }
        Ok(Self { root })
    }

    /// Locate and interpret `AWS::CloudFormation::Init.config`.
    ///
    /// Returns `Ok(None)` when either key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when a container on the way (or the `files` /
    /// `commands` section, or a file entry) has the wrong shape. Malformed
    /// individual commands are not errors here; they fail when run.
    pub fn config(&self) -> Result<Option<ConfigSection>, SchemaError> {
        let Some(root) = DirectiveNode::root(&self.root) else {
            return Ok(None);
        };
        let Some(config) = root.descend_path(&[INIT_KEY, CONFIG_KEY])? else {
            return Ok(None);
        };

        let files = config
            .descend(FILES_KEY)?
            .map(|files| directives::parse_files(&files))
            .transpose()?;
        let commands = config
            .descend(COMMANDS_KEY)?
            .map(|commands| directives::parse_commands(&commands));

        Ok(Some(ConfigSection { files, commands }))
    }
}
