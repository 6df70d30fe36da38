use std::backtrace::Backtrace;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::Location;
use std::path::Path;
use std::sync::{
    Arc,
    Mutex,
};

use anyhow::{
    Context,
    Result,
};
use tracing::debug;

use crate::config::LineFormat;
use crate::severity::{
    Severity,
    ALL_SEVERITIES,
};
use crate::writer::{
    LineWriter,
    SharedSink,
};

/// Stack dumps are cut off past this many bytes, with no truncation marker.
pub const STACK_BUFFER_SIZE: usize = 4096;

/// Leveled logger over a shared output sink.
///
/// Holds an immutable severity threshold and one [`LineWriter`] per
/// severity, all bound to the same sink. Emit calls below the threshold are
/// no-ops; ERROR and FATAL emits are followed by a stack dump at the same
/// severity. FATAL is a severity name only, it never exits the process.
pub struct Logger {
    threshold: Severity,
    writers: [LineWriter; 6],
}

impl Logger {
    /// Creates a logger writing to `out` with the given minimum severity.
    ///
    /// `level_name` must exactly match one of the six upper-case severity
    /// names; anything else silently falls back to TRACE, the most verbose
    /// setting. No I/O happens here.
    pub fn new(level_name: &str, out: impl Write + Send + 'static, format: LineFormat) -> Self {
        let threshold = Severity::from_name(level_name).unwrap_or_else(|| {
            debug!("Unrecognized log level {level_name:?}, defaulting to TRACE");
            Severity::Trace
        });

        let sink: SharedSink = Arc::new(Mutex::new(Box::new(out)));
        let writers =
            ALL_SEVERITIES.map(|severity| LineWriter::new(severity, Arc::clone(&sink), format));

        Self { threshold, writers }
    }

    /// Opens `path` for appending (creating it if needed) and logs into it.
    pub fn with_file(
        level_name: &str, path: impl AsRef<Path>, format: LineFormat,
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path.as_ref())
            .with_context(|| format!("Failed to open log file {}", path.as_ref().display()))?;

        Ok(Self::new(level_name, file, format))
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Whether an emit at `severity` would produce output.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    #[track_caller]
    pub fn tracef(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Trace, args);
    }

    #[track_caller]
    pub fn traceln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Trace, values);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Debug, args);
    }

    #[track_caller]
    pub fn debugln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Debug, values);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Info, args);
    }

    #[track_caller]
    pub fn infoln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Info, values);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Warn, args);
    }

    #[track_caller]
    pub fn warnln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Warn, values);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Error, args);
    }

    #[track_caller]
    pub fn errorln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Error, values);
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.printf_at(Severity::Fatal, args);
    }

    #[track_caller]
    pub fn fatalln(&self, values: &[&dyn fmt::Display]) {
        self.println_at(Severity::Fatal, values);
    }

    /// Shared primitive behind the `*f` methods.
    ///
    /// `#[track_caller]` propagates through the public methods, so
    /// [`Location::caller`] here resolves the user-visible call site, never
    /// this frame or the public wrapper.
    #[track_caller]
    fn printf_at(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }

        let location = Location::caller();
        let message = format!("{} {} {}", location.file(), location.line(), args);
        self.writers[severity.index()].write_line(Some(location), &message);

        if severity.dumps_stack() {
            self.dump_stack(severity);
        }
    }

    /// Shared primitive behind the `*ln` methods; values are space-joined.
    #[track_caller]
    fn println_at(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        if !self.enabled(severity) {
            return;
        }

        let location = Location::caller();
        let mut message = format!("{} {}", location.file(), location.line());
        for value in values {
            message.push(' ');
            message.push_str(&value.to_string());
        }
        self.writers[severity.index()].write_line(Some(location), &message);

        if severity.dumps_stack() {
            self.dump_stack(severity);
        }
    }

    /// Follow-up write for severe emits: the current stack, capped at
    /// [`STACK_BUFFER_SIZE`] bytes, at the same severity.
    fn dump_stack(&self, severity: Severity) {
        let mut trace = Backtrace::force_capture().to_string();

        if trace.len() > STACK_BUFFER_SIZE {
            let mut end = STACK_BUFFER_SIZE;
            while !trace.is_char_boundary(end) {
                end -= 1;
            }
            trace.truncate(end);
        }

        self.writers[severity.index()].write_line(None, &format!("Stack:\n{trace}"));
    }
}
