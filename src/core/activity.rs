//! Timestamped, user-facing activity log shown on the main screen.
//!
//! Separate from the `log` file output: these lines are short, fixed
//! strings meant for the user. Diagnostic detail goes to the log file.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: Level,
    pub text: String,
}

impl LogLine {
    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Bounded log; the oldest lines are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            at: Local::now(),
            level,
            text: text.into(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(Level::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_levels() {
        let mut log = ActivityLog::new(10);
        log.info("hello");
        log.error("boom");
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|l| l.level), Some(Level::Error));
        assert_eq!(log.last().map(|l| l.text.as_str()), Some("boom"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = ActivityLog::new(2);
        log.info("a");
        log.info("b");
        log.info("c");
        let texts: Vec<&str> = log.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_timestamp_format() {
        let mut log = ActivityLog::new(1);
        log.info("x");
        let stamp = log.last().unwrap().timestamp();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }
}
