//! Log line helpers: escape-code removal and UTC timestamps.
use chrono::{DateTime, Utc};

/// Timestamp format of the run header in the log file.
pub(super) const HEADER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format prefixed to each log file line.
pub(super) const LINE_FORMAT: &str = "%H:%M:%S";

/// Remove terminal escape sequences, keeping the visible text.
///
/// CSI sequences (`ESC [` ... final byte in `@`..=`~`) are dropped whole;
/// any other escape drops the character that follows it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut pieces = s.split('\x1b');
    let mut out = String::with_capacity(s.len());
    out.push_str(pieces.next().unwrap_or_default());

    for piece in pieces {
        let visible = piece.strip_prefix('[').map_or_else(
            || {
                let mut chars = piece.chars();
                chars.next();
                chars.as_str()
            },
            |csi| {
                csi.find(|c: char| ('@'..='~').contains(&c))
                    .and_then(|end| csi.get(end + 1..))
                    .unwrap_or_default()
            },
        );
        out.push_str(visible);
    }
    out
}

/// Format `at` with a `chrono` format string.
pub(super) fn format_utc(at: DateTime<Utc>, format: &str) -> String {
    at.format(format).to_string()
}

/// Format the current UTC time with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    format_utc(Utc::now(), format)
}
