//! Metadata-driven instance initialization.
//!
//! Reads a CloudFormation::Init style metadata document, writes the files
//! listed under `AWS::CloudFormation::Init.config.files`, then runs
//! `config.commands` through the shell in lexicographic order of their
//! identifiers, with optional `test` gating and fail-fast semantics.
//!
//! The public API is organised into layers:
//!
//! - **[`metadata`]**: load the document and interpret it into typed directives
//! - **[`resources`]**: apply one file or command directive
//! - **[`tasks`]**: the files and commands stages, with ordering and fail-fast
//! - **[`commands`]**: the top-level apply orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod metadata;
pub mod resources;
pub mod tasks;
