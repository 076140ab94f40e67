//! Error types
//!
//! State machine configuration and lookup errors, session setup errors and
//! level file errors.

use std::fmt;
use std::io;

/// Error type for state machine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// A state with this name is already registered
    DuplicateState(String),
    /// No state with this name is registered
    UnknownState(String),
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsmError::DuplicateState(name) => write!(f, "State already registered: {}", name),
            FsmError::UnknownState(name) => write!(f, "Unknown state: {}", name),
        }
    }
}

impl std::error::Error for FsmError {}

/// Error building or driving a session
#[derive(Debug)]
pub enum SessionError {
    /// State machine misconfiguration
    Fsm(FsmError),
    /// A character state needs a clip that was never bound
    MissingClip(String),
}

impl From<FsmError> for SessionError {
    fn from(e: FsmError) -> Self {
        SessionError::Fsm(e)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Fsm(e) => write!(f, "State machine error: {}", e),
            SessionError::MissingClip(name) => write!(f, "Animation clip not bound: {}", name),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Fsm(e) => Some(e),
            SessionError::MissingClip(_) => None,
        }
    }
}

/// Error loading a level file
#[derive(Debug)]
pub enum LevelLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for LevelLoadError {
    fn from(e: io::Error) -> Self {
        LevelLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelLoadError::Parse(e)
    }
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelLoadError::Io(e) => write!(f, "IO error: {}", e),
            LevelLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelLoadError::Io(e) => Some(e),
            LevelLoadError::Parse(e) => Some(e),
        }
    }
}

/// Error saving a level file
#[derive(Debug)]
pub enum LevelSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for LevelSaveError {
    fn from(e: io::Error) -> Self {
        LevelSaveError::Io(e)
    }
}

impl From<ron::Error> for LevelSaveError {
    fn from(e: ron::Error) -> Self {
        LevelSaveError::Serialize(e)
    }
}

impl fmt::Display for LevelSaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSaveError::Io(e) => write!(f, "IO error: {}", e),
            LevelSaveError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for LevelSaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fsm_error_display() {
        let err = FsmError::DuplicateState("idle".to_string());
        assert!(format!("{}", err).contains("already registered"));
        assert!(format!("{}", err).contains("idle"));

        let err = FsmError::UnknownState("jump".to_string());
        assert!(format!("{}", err).contains("Unknown state"));
        assert!(format!("{}", err).contains("jump"));
    }

    #[test]
    fn test_session_error_from_fsm() {
        let err: SessionError = FsmError::UnknownState("idle".to_string()).into();
        assert!(matches!(err, SessionError::Fsm(_)));
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("State machine error"));
    }

    #[test]
    fn test_missing_clip_display() {
        let err = SessionError::MissingClip("reload".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("reload"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_level_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let err: LevelLoadError = io_err.into();
        let msg = format!("{}", err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn test_level_parse_error() {
        let parse_err = ron::from_str::<u32>("not a number").unwrap_err();
        let err: LevelLoadError = parse_err.into();
        assert!(matches!(err, LevelLoadError::Parse(_)));
        assert!(format!("{}", err).contains("Parse error"));
    }
}
