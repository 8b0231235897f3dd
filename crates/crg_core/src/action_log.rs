//! Append-only action log shown in the window.
//!
//! Every user-visible action and failure lands here as one timestamped
//! line. The log is never persisted and never truncated.

use chrono::{DateTime, Local};

/// Timestamp format used for every visible log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamped log line.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }

    /// Render as the visible `[timestamp] message` line.
    pub fn format(&self) -> String {
        format!(
            "[{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.message
        )
    }
}

/// Ordered, append-only sequence of log entries.
///
/// Keeps a pre-rendered text buffer so the view can display the whole log
/// without re-formatting every entry on every frame.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
    rendered: String,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time.
    pub fn append(&mut self, message: impl Into<String>) {
        let entry = LogEntry::new(message);
        self.rendered.push_str(&entry.format());
        self.rendered.push('\n');
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Latest message, unformatted (mirrored to the status line).
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }

    /// Full rendered text, one `[timestamp] message` line per entry.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    #[test]
    fn append_keeps_order_and_renders_lines() {
        let mut log = ActionLog::new();
        log.append("first");
        log.append("second");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].message, "first");
        assert_eq!(log.entries()[1].message, "second");

        let lines: Vec<&str> = log.rendered().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn latest_mirrors_last_message() {
        let mut log = ActionLog::new();
        assert_eq!(log.latest(), None);

        log.append("one");
        log.append("two");
        assert_eq!(log.latest(), Some("two"));
    }

    #[test]
    fn lines_carry_a_second_precision_timestamp() {
        let mut log = ActionLog::new();
        log.append("stamped");

        let line = log.entries()[0].format();
        assert!(line.starts_with('['));

        // "[YYYY-MM-DD HH:MM:SS] " is 22 chars; the stamp itself is 19.
        let stamp = &line[1..20];
        assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(&line[20..22], "] ");
    }
}
