//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use super::STAGE_TARGET;
use super::utils::{HEADER_FORMAT, LINE_FORMAT, strip_ansi, utc_now};

/// How an event is rendered, shared by the console and the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Error,
    Warn,
    Info,
    Debug,
}

impl LineKind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match *metadata.level() {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text prefix used in the log file.
    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Info => "    ",
            Self::Debug => "    [debug] ",
        }
    }
}

/// Collects the `message` field of an event.
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl MessageExtractor {
    fn extract(event: &tracing::Event<'_>) -> String {
        let mut extractor = Self::default();
        event.record(&mut extractor);
        extractor.message
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.clear();
            let _ = write!(self.message, "{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the
/// `--log-file`, timestamped and without ANSI codes.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open `path` for appending (creating it and its parent directories)
    /// and write a run header.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or file cannot be created, or
    /// the header cannot be written.
    pub(super) fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        let rule = "=".repeat(42);
        writeln!(
            file,
            "{rule}\nmeta-init v{} {}\n{rule}",
            env!("CARGO_PKG_VERSION"),
            utc_now(HEADER_FORMAT),
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let kind = LineKind::of(event.metadata());
        let msg = strip_ansi(&MessageExtractor::extract(event));
        let line = format!("[{}] {}{msg}", utc_now(LINE_FORMAT), kind.file_prefix());

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that renders stage headers,
/// progress lines, warnings, and errors for the console.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = MessageExtractor::extract(event);
        match LineKind::of(event.metadata()) {
            LineKind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            LineKind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            LineKind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            LineKind::Info => writeln!(writer, "  {msg}"),
            LineKind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout at `INFO` (or `DEBUG` when `verbose`).
/// When `log_file` is given, every event at `DEBUG` and above is also
/// appended to it. A log file that cannot be opened is reported as a
/// warning on the console and the run continues without it.
/// Must be called once at program startup.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(io::stdout)
        .with_filter(console_level);

    let (file_layer, open_error) = match log_file.map(|path| (path, FileLayer::new(path))) {
        Some((_, Ok(layer))) => (Some(layer.with_filter(LevelFilter::DEBUG)), None),
        Some((path, Err(e))) => (None, Some((path, e))),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some((path, e)) = open_error {
        tracing::warn!("cannot open log file {}: {e}", path.display());
    }
}
