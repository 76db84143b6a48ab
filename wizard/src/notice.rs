//! Banner messages shown by the host.
//!
//! The controller reports outcomes that are not tied to a single field
//! (conflicts, transport failures, submission results) as [`Notice`]s.
//! Hosts render them as a message box, a toast, or a terminal line.

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Emoji prefix for terminal hosts.
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        }
    }
}

/// A single banner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Local time the notice was raised (HH:MM:SS).
    pub timestamp: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_level_and_timestamp() {
        let notice = Notice::error("Username already exists.");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Username already exists.");
        assert_eq!(notice.timestamp.len(), 8);
        assert_eq!(notice.timestamp.matches(':').count(), 2);
    }

    #[test]
    fn test_levels_have_distinct_emoji() {
        let notices = [
            Notice::info("Cancelled."),
            Notice::success("Done"),
            Notice::warning("No session cookie"),
            Notice::error("Failed"),
        ];
        let levels: Vec<NoticeLevel> = notices.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Info, NoticeLevel::Success, NoticeLevel::Warning, NoticeLevel::Error]
        );
        assert_eq!(notices[2].level.emoji(), "⚠️");
        assert_eq!(notices[0].level.emoji(), "ℹ️");
    }

    #[test]
    fn test_serializes_lowercase_level() {
        let json = serde_json::to_value(Notice::success("Done")).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["message"], "Done");
    }
}
