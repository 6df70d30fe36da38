use std::fmt;

/// Log severity, ordered from most verbose to most critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// All severities in ascending order. The writer table is indexed by this.
pub const ALL_SEVERITIES: [Severity; 6] = [
    Severity::Trace,
    Severity::Debug,
    Severity::Info,
    Severity::Warn,
    Severity::Error,
    Severity::Fatal,
];

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Exact, case-sensitive match against the six display names.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_SEVERITIES.iter().copied().find(|s| s.name() == name)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// ERROR and FATAL carry a stack dump as a follow-up write.
    pub fn dumps_stack(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
