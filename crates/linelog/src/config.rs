use chrono::{
    DateTime,
    Utc,
};

/// Formatting flags shared by all six per-severity writers.
///
/// These mirror the conventional stdlib-logger options: calendar date,
/// clock time, sub-second precision, and a short `file:line:` prefix at the
/// formatter level. They only control the prefix between the severity name
/// and the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    date: bool,
    time: bool,
    microseconds: bool,
    short_file: bool,
}

impl LineFormat {
    /// No prefix at all: `<NAME> <message>`.
    pub fn none() -> Self {
        Self {
            date: false,
            time: false,
            microseconds: false,
            short_file: false,
        }
    }

    pub fn builder() -> LineFormatBuilder {
        LineFormatBuilder::new()
    }

    pub fn date(&self) -> bool {
        self.date
    }

    pub fn time(&self) -> bool {
        // Microsecond precision implies a clock component.
        self.time || self.microseconds
    }

    pub fn microseconds(&self) -> bool {
        self.microseconds
    }

    pub fn short_file(&self) -> bool {
        self.short_file
    }

    /// Renders the timestamp portion of the line prefix, trailing space
    /// included. Empty when neither date nor time is requested.
    pub fn timestamp_prefix(&self, now: DateTime<Utc>) -> String {
        let mut prefix = String::new();

        if self.date {
            prefix.push_str(&now.format("%Y/%m/%d ").to_string());
        }

        if self.time() {
            if self.microseconds {
                prefix.push_str(&now.format("%H:%M:%S%.6f ").to_string());
            } else {
                prefix.push_str(&now.format("%H:%M:%S ").to_string());
            }
        }

        prefix
    }
}

impl Default for LineFormat {
    /// Date and time, no sub-second precision, no short-file prefix.
    fn default() -> Self {
        Self {
            date: true,
            time: true,
            microseconds: false,
            short_file: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct LineFormatBuilder {
    date: bool,
    time: bool,
    microseconds: bool,
    short_file: bool,
}

impl LineFormatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, enable: bool) -> Self {
        self.date = enable;
        self
    }

    pub fn time(mut self, enable: bool) -> Self {
        self.time = enable;
        self
    }

    pub fn microseconds(mut self, enable: bool) -> Self {
        self.microseconds = enable;
        self
    }

    pub fn short_file(mut self, enable: bool) -> Self {
        self.short_file = enable;
        self
    }

    pub fn build(self) -> LineFormat {
        LineFormat {
            date: self.date,
            time: self.time,
            microseconds: self.microseconds,
            short_file: self.short_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap()
    }

    #[test]
    fn test_none_renders_empty_prefix() {
        assert_eq!(LineFormat::none().timestamp_prefix(fixed_now()), "");
    }

    #[test]
    fn test_default_renders_date_and_time() {
        let prefix = LineFormat::default().timestamp_prefix(fixed_now());
        assert_eq!(prefix, "2024/03/07 14:05:09 ");
    }

    #[test]
    fn test_builder_date_only() {
        let format = LineFormat::builder().date(true).build();
        assert_eq!(format.timestamp_prefix(fixed_now()), "2024/03/07 ");
    }

    #[test]
    fn test_microseconds_implies_time() {
        let format = LineFormat::builder().microseconds(true).build();
        assert!(format.time());

        let prefix = format.timestamp_prefix(fixed_now());
        assert!(prefix.starts_with("14:05:09."));
        // Six fractional digits plus the trailing separator.
        assert_eq!(prefix.len(), "14:05:09.".len() + 6 + 1);
    }

    #[test]
    fn test_short_file_flag_round_trips() {
        assert!(!LineFormat::default().short_file());
        assert!(LineFormat::builder().short_file(true).build().short_file());
    }
}
