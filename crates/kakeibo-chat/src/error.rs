//! Error types for the conversational interface.

use kakeibo_core::error::KakeiboError;
use kakeibo_core::types::UserId;

/// Errors from the chat engines.
///
/// None of these are shown to users verbatim: validation failures are
/// handled with re-prompt replies, and storage failures surface as a generic
/// failure reply while the underlying error is logged.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    /// `advance` was called for a user with no active session. This is a
    /// contract violation by the dispatcher, never a user-facing condition.
    #[error("no active wizard session for user {0}")]
    NoActiveSession(UserId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<KakeiboError> for ChatError {
    fn from(err: KakeiboError) -> Self {
        ChatError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::EmptyMessage;
        assert_eq!(err.to_string(), "message cannot be empty");

        let err = ChatError::MessageTooLong(2000);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 2000 characters"
        );

        let err = ChatError::NoActiveSession(UserId(42));
        assert_eq!(err.to_string(), "no active wizard session for user 42");

        let err = ChatError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn test_chat_error_from_kakeibo_error() {
        let storage_err = KakeiboError::Storage("connection lost".to_string());
        let chat_err: ChatError = storage_err.into();
        assert!(matches!(chat_err, ChatError::Storage(_)));
        assert!(chat_err.to_string().contains("connection lost"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = ChatError::NoActiveSession(UserId(1));
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("NoActiveSession"));
    }
}
