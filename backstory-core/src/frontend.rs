//! The interface a host offers for forms, dialogs and notifications.
//!
//! The request handler only talks to a [`Frontend`]; each host (terminal,
//! batch runner, test harness) supplies its own implementation.

use crate::form::BackstoryForm;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warn => "warn",
            NoticeLevel::Error => "error",
        }
    }
}

/// Form, dialog and notification surface of a host.
pub trait Frontend {
    /// Show the pre-filled form and return what the user submitted.
    ///
    /// `None` means the form was dismissed.
    fn fill_form(&mut self, form: BackstoryForm) -> Option<BackstoryForm>;

    /// Show a short notification.
    fn notify(&mut self, level: NoticeLevel, message: &str);

    /// Show a generated backstory in a dialog.
    fn show_backstory(&mut self, title: &str, html: &str);

    /// Show a longer informational message, such as the welcome guide.
    fn show_message(&mut self, html: &str);

    /// Whether the form that started the request is still around to
    /// receive its result.
    fn is_open(&self) -> bool {
        true
    }
}
