//! Version string shown by `--version`.

/// `v<semver> (built w/rustc <version>)`.
///
/// clap prefixes it with the binary name, giving e.g.
/// `meta-init v0.1.0 (built w/rustc 1.91.0)`.
pub const VERSION: &str = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    " (built w/",
    env!("META_INIT_RUSTC_VERSION"),
    ")"
);
