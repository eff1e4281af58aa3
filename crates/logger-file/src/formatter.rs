//! Renders records into output lines.

use std::fmt::Write;

use proven_logger::Record;

/// `chrono` format of the line timestamp, e.g. `24/03/07 14:05:09.042`.
pub const TIMESTAMP_FORMAT: &str = "%y/%m/%d %H:%M:%S%.3f";

/// Formats records as `<timestamp> [<thread-id>][<level>] - <message>`.
///
/// Thread id and level are left-aligned in five columns so consecutive lines
/// stay readable.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternFormatter;

impl PatternFormatter {
    /// Appends the line for `record`, newline included, to `out`.
    pub fn format(self, record: &Record<'_>, out: &mut String) {
        let _ = writeln!(
            out,
            "{} [{:<5}][{:<5}] - {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.thread_id,
            record.level,
            record.message
        );
    }

    /// Convenience wrapper returning the line as a new string.
    #[must_use]
    pub fn format_to_string(self, record: &Record<'_>) -> String {
        let mut line = String::new();
        self.format(record, &mut line);
        line
    }
}
