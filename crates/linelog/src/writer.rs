use std::io::Write;
use std::panic::Location;
use std::sync::{
    Arc,
    Mutex,
};

use chrono::Utc;
use tracing::debug;

use crate::config::LineFormat;
use crate::severity::Severity;

/// Output sink shared by all six per-severity writers. The logger only ever
/// appends to it and never closes it.
pub type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Formatter and sink binding for a single severity. Produces one
/// terminated text line per call.
pub struct LineWriter {
    prefix: &'static str,
    format: LineFormat,
    sink: SharedSink,
}

impl LineWriter {
    pub fn new(severity: Severity, sink: SharedSink, format: LineFormat) -> Self {
        Self {
            prefix: severity.name(),
            format,
            sink,
        }
    }

    /// Writes `<NAME> <format-prefix><message>\n`.
    ///
    /// The whole line goes out in a single `write_all` under the sink lock,
    /// so concurrent callers never interleave mid-line. Write failures are
    /// swallowed; logging must not become a source of caller-visible errors.
    pub fn write_line(&self, location: Option<&Location<'_>>, message: &str) {
        let mut line = String::with_capacity(self.prefix.len() + message.len() + 32);
        line.push_str(self.prefix);
        line.push(' ');
        line.push_str(&self.format.timestamp_prefix(Utc::now()));

        if self.format.short_file() {
            if let Some(location) = location {
                let file = location.file();
                let base = file.rsplit(['/', '\\']).next().unwrap_or(file);
                line.push_str(base);
                line.push(':');
                line.push_str(&location.line().to_string());
                line.push_str(": ");
            }
        }

        line.push_str(message);
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            // A panic in another writer must not silence this one.
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(err) = sink.write_all(line.as_bytes()) {
            debug!("Dropping log line after sink write failure: {err}");
            return;
        }

        if let Err(err) = sink.flush() {
            debug!("Failed to flush log sink: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn writer_over(buf: &SharedBuf, severity: Severity, format: LineFormat) -> LineWriter {
        let sink: SharedSink = Arc::new(Mutex::new(Box::new(buf.clone())));
        LineWriter::new(severity, sink, format)
    }

    #[test]
    fn test_line_carries_severity_prefix_and_newline() {
        let buf = SharedBuf::default();
        let writer = writer_over(&buf, Severity::Info, LineFormat::none());

        writer.write_line(None, "hello");

        assert_eq!(buf.contents(), "INFO hello\n");
    }

    #[test]
    fn test_trailing_newline_not_duplicated() {
        let buf = SharedBuf::default();
        let writer = writer_over(&buf, Severity::Warn, LineFormat::none());

        writer.write_line(None, "already terminated\n");

        assert_eq!(buf.contents(), "WARN already terminated\n");
    }

    #[test]
    fn test_timestamp_prefix_precedes_message() {
        let buf = SharedBuf::default();
        let writer = writer_over(&buf, Severity::Debug, LineFormat::default());

        writer.write_line(None, "m");

        let line = buf.contents();
        assert!(line.starts_with("DEBUG "));
        // `DEBUG YYYY/MM/DD HH:MM:SS m\n`
        let rest = line.strip_prefix("DEBUG ").unwrap();
        assert_eq!(rest.len(), "YYYY/MM/DD HH:MM:SS m\n".len());
        assert!(rest.ends_with(" m\n"));
    }

    #[test]
    fn test_short_file_prefix_uses_basename() {
        let buf = SharedBuf::default();
        let format = LineFormat::builder().short_file(true).build();
        let writer = writer_over(&buf, Severity::Error, format);

        let location = Location::caller();
        writer.write_line(Some(location), "boom");

        let line = buf.contents();
        assert!(line.starts_with("ERROR writer.rs:"));
        assert!(line.ends_with(": boom\n"));
        assert!(!line.contains('/'));
    }

    #[test]
    fn test_short_file_omitted_without_location() {
        let buf = SharedBuf::default();
        let format = LineFormat::builder().short_file(true).build();
        let writer = writer_over(&buf, Severity::Error, format);

        writer.write_line(None, "boom");

        assert_eq!(buf.contents(), "ERROR boom\n");
    }
}
