//! Logging infrastructure for console output, the optional log file, and
//! the end-of-run summary.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{DirectiveEntry, DirectiveKind, DirectiveStatus};

/// `tracing` target used for stage headers.
pub(crate) const STAGE_TARGET: &str = "meta_init::stage";
