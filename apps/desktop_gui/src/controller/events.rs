//! UI/backend events and error modeling for the desktop app.

use client_core::PageState;
use shared::protocol::UserSummary;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    UserDirectoryLoaded(Vec<UserSummary>),
    /// Snapshot of the page controller's state after it handled a command.
    PageUpdated(PageState),
    /// The controller requested navigation back to the root page; the UI
    /// tears its form state down in response.
    NavigatedHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    UserDirectory,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("not found")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_failures_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::UserDirectory,
            "error sending request: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::UserDirectory);
    }

    #[test]
    fn classifies_missing_page_elements_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "required page elements not found: qrcodeList",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn unrecognized_messages_fall_back_to_unknown() {
        let err = UiError::from_message(UiErrorContext::General, "something odd happened");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
    }
}
