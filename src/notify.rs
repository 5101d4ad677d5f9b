//! Transient notifications ("toasts") shown in the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::ClientError;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    notices: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message, Instant::now());
    }

    pub fn from_error(&mut self, err: &ClientError) {
        self.error(err.user_message());
    }

    /// Newest notice still inside its display window.
    pub fn current(&mut self, now: Instant) -> Option<&Notice> {
        self.notices
            .retain(|notice| now.saturating_duration_since(notice.shown_at) < NOTICE_TTL);
        self.notices.back()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_notice_wins() {
        let mut notes = Notifications::new();
        let now = Instant::now();
        notes.push(Level::Success, "Expense created successfully", now);
        notes.push(Level::Error, "Amount must be positive", now);

        let current = notes.current(now).unwrap();
        assert_eq!(current.level, Level::Error);
        assert_eq!(current.message, "Amount must be positive");
    }

    #[test]
    fn test_notices_expire() {
        let mut notes = Notifications::new();
        let start = Instant::now();
        notes.push(Level::Success, "Receipt uploaded", start);

        assert!(notes.current(start + Duration::from_secs(3)).is_some());
        assert!(notes.current(start + NOTICE_TTL).is_none());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notes = Notifications::new();
        let now = Instant::now();
        for i in 0..12 {
            notes.push(Level::Success, format!("n{}", i), now);
        }
        assert_eq!(notes.notices.len(), MAX_NOTICES);
        assert_eq!(notes.current(now).unwrap().message, "n11");
    }

    #[test]
    fn test_from_error_uses_user_message() {
        let mut notes = Notifications::new();
        notes.from_error(&ClientError::Unauthorized { message: None });
        let now = Instant::now();
        assert_eq!(
            notes.current(now).unwrap().message,
            "Session expired. Please log in again."
        );
    }
}
