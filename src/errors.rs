//! Ошибки операций и агрегаты частичных сбоев.
//!
//! Политика (две плоскости):
//! - SwitchError — ветвимые состояния, на которые вызывающая сторона реагирует
//!   по-разному (AlreadyExists/NotFound/Busy/...). Переносится внутри anyhow,
//!   CLI делает downcast там, где нужно различать.
//! - Per-resource сбои НЕ пересекают границу движков как Err: они собираются
//!   в ResourceFailure-списки внутри отчётов (capture/restore) — best-effort.

use std::error::Error;
use std::fmt;

/// Условия, на которые вызывающая сторона ветвится явно.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// Profile directory already exists and overwrite was not confirmed.
    AlreadyExists(String),
    /// Named profile does not exist under the profiles root.
    NotFound(String),
    /// Profile name is empty after sanitization (or was not sanitized).
    InvalidName(String),
    /// No readable identity in the state store (not logged in).
    IdentityUnavailable,
    /// The application is running and the caller did not confirm termination.
    AppRunning,
    /// Termination was requested but the process set did not exit in time.
    TerminationFailed,
    /// Another save/switch/delete holds the profiles root lock.
    Busy,
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::AlreadyExists(name) => {
                write!(f, "profile '{}' already exists (pass overwrite to replace)", name)
            }
            SwitchError::NotFound(name) => write!(f, "profile '{}' not found", name),
            SwitchError::InvalidName(input) => {
                write!(f, "profile name '{}' is empty after sanitization", input)
            }
            SwitchError::IdentityUnavailable => {
                write!(f, "no identity in state store (is anyone logged in?)")
            }
            SwitchError::AppRunning => {
                write!(f, "application is running (termination not confirmed)")
            }
            SwitchError::TerminationFailed => {
                write!(f, "application termination was not confirmed within the wait window")
            }
            SwitchError::Busy => write!(f, "another operation holds the profiles root lock"),
        }
    }
}

impl Error for SwitchError {}

/// Один записанный per-resource сбой (capture или restore).
/// message — человекочитаемый текст с контекстом (включая PermissionDenied и т.п.).
#[derive(Debug, Clone)]
pub struct ResourceFailure {
    pub name: String,
    pub message: String,
}

impl ResourceFailure {
    pub fn new(name: &str, err: &anyhow::Error) -> Self {
        Self {
            name: name.to_string(),
            message: format!("{:#}", err),
        }
    }
}

impl fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}
