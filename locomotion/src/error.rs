use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while setting up locomotion: loading configuration and
/// building level data. Per-frame gameplay never returns these; it logs and
/// skips whatever depended on the missing piece.
#[derive(Debug)]
pub enum LocomotionError {
    /// The configuration file could not be parsed
    Config { path: PathBuf, reason: String },

    /// I/O operation failures
    Io {
        operation: String,
        source: io::Error,
    },

    /// A value is out of its allowed range or inconsistent with another
    Validation { item: String, reason: String },
}

impl LocomotionError {
    pub fn validation(item: impl Into<String>, reason: impl Into<String>) -> Self {
        LocomotionError::Validation {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LocomotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocomotionError::Config { path, reason } => {
                write!(f, "Configuration error in '{}': {}", path.display(), reason)
            }
            LocomotionError::Io { operation, source } => {
                write!(f, "I/O error during '{}': {}", operation, source)
            }
            LocomotionError::Validation { item, reason } => {
                write!(f, "Validation failed for '{}': {}", item, reason)
            }
        }
    }
}

impl std::error::Error for LocomotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocomotionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LocomotionError>;
