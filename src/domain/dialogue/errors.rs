//! Game-level error taxonomy.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::ports::{JudgeError, JudgeErrorKind, StoreError};

/// Errors surfaced to callers of the session operations.
///
/// Only `JudgeTransient` is worth resending as-is; none of these variants
/// leave a partially updated session behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game not found: {0}")]
    NotFound(SessionId),

    #[error("Game already over")]
    AlreadyOver,

    #[error("Not doctor's turn")]
    WrongTurn,

    #[error("Message too long: at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Judge temporarily unavailable: {0}")]
    JudgeTransient(String),

    #[error("Judge failed: {0}")]
    JudgeFatal(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    pub fn not_found(id: SessionId) -> Self {
        GameError::NotFound(id)
    }

    pub fn too_long(max: usize, actual: usize) -> Self {
        GameError::TooLong { max, actual }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        GameError::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GameError::Internal(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::NotFound(_) => ErrorCode::SessionNotFound,
            GameError::AlreadyOver => ErrorCode::GameAlreadyOver,
            GameError::WrongTurn => ErrorCode::WrongTurn,
            GameError::TooLong { .. } => ErrorCode::MessageTooLong,
            GameError::EmptyMessage => ErrorCode::EmptyMessage,
            GameError::JudgeTransient(_) => ErrorCode::JudgeUnavailable,
            GameError::JudgeFatal(_) => ErrorCode::JudgeFailed,
            GameError::Storage(_) => ErrorCode::StorageError,
            GameError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True when the caller may resend the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::JudgeTransient(_))
    }
}

impl From<JudgeError> for GameError {
    fn from(err: JudgeError) -> Self {
        match err.kind() {
            JudgeErrorKind::Transient => GameError::JudgeTransient(err.to_string()),
            JudgeErrorKind::Fatal => GameError::JudgeFatal(err.to_string()),
        }
    }
}

impl From<ValidationError> for GameError {
    fn from(err: ValidationError) -> Self {
        GameError::Internal(err.to_string())
    }
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        GameError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_messages_match_player_wording() {
        assert_eq!(GameError::AlreadyOver.message(), "Game already over");
        assert_eq!(GameError::WrongTurn.message(), "Not doctor's turn");
        assert_eq!(
            GameError::too_long(100, 120).message(),
            "Message too long: at most 100 characters, got 120"
        );
    }

    #[test]
    fn judge_errors_split_by_kind() {
        assert!(matches!(
            GameError::from(JudgeError::timeout(30)),
            GameError::JudgeTransient(_)
        ));
        assert!(matches!(
            GameError::from(JudgeError::AuthenticationFailed),
            GameError::JudgeFatal(_)
        ));
    }

    #[test]
    fn only_transient_judge_errors_are_retryable() {
        assert!(GameError::JudgeTransient("x".into()).is_retryable());
        assert!(!GameError::JudgeFatal("x".into()).is_retryable());
        assert!(!GameError::AlreadyOver.is_retryable());
        assert!(!GameError::NotFound(SessionId::new()).is_retryable());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(GameError::EmptyMessage.code(), ErrorCode::EmptyMessage);
        assert_eq!(GameError::storage("down").code(), ErrorCode::StorageError);
        assert_eq!(
            GameError::from(StoreError::unavailable("x")).code(),
            ErrorCode::StorageError
        );
    }
}
