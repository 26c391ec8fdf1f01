//! Captures the compiler version for the `--version` line.
#![allow(clippy::print_stdout)]
use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(&rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            let text = String::from_utf8_lossy(&output.stdout).to_string();
            // "rustc 1.91.0 (f8297e351 2025-10-28)" -> "rustc 1.91.0"
            let mut words = text.split_whitespace();
            Some(format!("{} {}", words.next()?, words.next()?))
        })
        .unwrap_or_else(|| "rustc unknown".to_string());
    println!("cargo:rustc-env=META_INIT_RUSTC_VERSION={version}");

    println!("cargo:rerun-if-env-changed=RUSTC");
}
