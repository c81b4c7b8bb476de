//! Error types for the player

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use lottie_bundle_core::BundleError;

/// Message shown for any document the engine cannot use.
pub const BROKEN_FILE_MESSAGE: &str = "Broken or corrupted file";

/// Failures surfaced by player operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PlayerError {
    /// Fetching or unpacking the source failed
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// The document lacks fields every Lottie animation carries
    #[error("Broken or corrupted file: missing {}", .missing.join(", "))]
    Malformed { missing: Vec<&'static str> },

    /// The rendering engine rejected the animation
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An attribute value could not be parsed
    #[error("Invalid value '{value}' for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },

    /// The operation needs a loaded animation
    #[error("No animation loaded")]
    NotLoaded,
}

impl PlayerError {
    /// Status reported with the Error event.
    pub fn status(&self) -> u16 {
        match self {
            Self::Bundle(e) => e.status(),
            Self::Malformed { .. } | Self::InvalidAttribute { .. } => 400,
            Self::Engine(_) | Self::NotLoaded => 500,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Bundle(e) => e.category(),
            Self::Malformed { .. } => "content",
            Self::Engine(_) => "engine",
            Self::InvalidAttribute { .. } => "config",
            Self::NotLoaded => "state",
        }
    }

    /// Reduce to what the host displays. Content problems collapse into the
    /// generic broken-file message; transport failures keep their text.
    pub fn info(&self) -> ErrorInfo {
        let message = match self {
            Self::Bundle(BundleError::Transport { .. }) | Self::InvalidAttribute { .. } => {
                self.to_string()
            }
            Self::NotLoaded => self.to_string(),
            _ => BROKEN_FILE_MESSAGE.to_string(),
        };
        ErrorInfo {
            message,
            status: self.status(),
        }
    }
}

/// Error as carried by player state and the Error event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub status: u16,
}

impl From<&PlayerError> for ErrorInfo {
    fn from(err: &PlayerError) -> Self {
        err.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_collapses_to_generic_message() {
        let err = PlayerError::Malformed {
            missing: vec!["layers"],
        };
        let info = err.info();
        assert_eq!(info.message, BROKEN_FILE_MESSAGE);
        assert_eq!(info.status, 400);
        assert!(err.to_string().contains("layers"));
    }

    #[test]
    fn transport_keeps_status_and_text() {
        let err: PlayerError = BundleError::Transport {
            status: 404,
            status_text: "Not Found".into(),
        }
        .into();
        let info = err.info();
        assert_eq!(info.status, 404);
        assert!(info.message.contains("Not Found"));
        assert_eq!(err.category(), "transport");
    }

    #[test]
    fn bundle_content_errors_are_broken_files() {
        let err = PlayerError::from(BundleError::NoAnimations);
        assert_eq!(err.info().message, BROKEN_FILE_MESSAGE);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn engine_errors_are_500() {
        let err = PlayerError::from(EngineError::new("boom"));
        assert_eq!(err.status(), 500);
        assert_eq!(err.category(), "engine");
    }
}
