// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
///
/// Delivery failures are not represented here: they are contained inside the
/// drain loop and only ever show up as a `last_error` string.
#[derive(Debug, Error)]
pub enum Error {
    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("duplicate action id: {0}")]
    DuplicateAction(String),

    #[error("invalid action type: '{0}'\n  hint: valid types are: {valid}", valid = crate::action::ActionType::valid_list())]
    InvalidActionType(String),

    #[error("invalid payload for {action_type}: {reason}")]
    InvalidPayload { action_type: String, reason: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    pub(crate) fn invalid_payload(action_type: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidPayload {
            action_type: action_type.to_string(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
