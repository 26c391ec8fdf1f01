//! Top-level command orchestration.
pub mod apply;
pub mod version;
