//! Resource primitives that apply one directive to the machine.
pub mod command;
pub mod fetch;
pub mod file;
pub mod helpers;

/// A directive that can be described and applied.
///
/// Each resource reports failures with its own typed error so that callers
/// can tell a file problem from a command problem without downcasting.
pub trait Applicable {
    /// Error returned when the change cannot be applied.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] when the change was attempted and failed.
    fn apply(&self) -> Result<ResourceChange, Self::Error>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use meta_init::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let skipped = ResourceChange::Skipped { reason: "test exited 1".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The change was made.
    Applied,
    /// Nothing was done (e.g. a gating test failed, or content is unsupported).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}
