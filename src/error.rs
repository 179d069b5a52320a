//! Error types for Core Audio property access.

use thiserror::Error;

use crate::status::{known, PropertyId, StatusCode};

/// Errors surfaced by the codec and the property accessor.
///
/// Failures coming from the foreign capability keep their raw status in
/// [`CoreAudioError::Underlying`]; the codec is only used to render it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreAudioError {
    #[error("Invalid audio object handle")]
    InvalidHandle,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported property {0}")]
    UnsupportedProperty(PropertyId),

    #[error("{operation} failed with error: {status} ({})", .status.0)]
    Underlying {
        status: StatusCode,
        operation: &'static str,
    },

    #[error("Property {id} size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        id: PropertyId,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid data for property {id}: {reason}")]
    InvalidData { id: PropertyId, reason: String },
}

impl CoreAudioError {
    /// Wraps a raw non-success status returned by `operation`.
    pub fn from_status(status: StatusCode, operation: &'static str) -> Self {
        Self::Underlying { status, operation }
    }

    /// Representative status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidHandle => known::AUDIO_FILE_INVALID_FILE,
            Self::InvalidInput(_) | Self::InvalidData { .. } => {
                known::AUDIO_FILE_UNSUPPORTED_DATA_FORMAT
            }
            Self::UnsupportedProperty(_) => known::AUDIO_FILE_UNSUPPORTED_PROPERTY,
            Self::Underlying { status, .. } => *status,
            Self::SizeMismatch { .. } => known::AUDIO_FILE_BAD_PROPERTY_SIZE,
        }
    }
}

/// Result type for Core Audio operations.
pub type Result<T> = std::result::Result<T, CoreAudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underlying_display_uses_fourcc() {
        let err = CoreAudioError::from_status(StatusCode::from_bytes(*b"wht?"), "AudioFileOpenURL");
        assert_eq!(
            err.to_string(),
            format!("AudioFileOpenURL failed with error: 'wht?' ({})", 0x7768743F)
        );
    }

    #[test]
    fn test_underlying_display_decimal() {
        let err = CoreAudioError::from_status(StatusCode(-43), "AudioFileOpenURL");
        assert_eq!(err.to_string(), "AudioFileOpenURL failed with error: -43 (-43)");
    }

    #[test]
    fn test_unsupported_property_display() {
        let err = CoreAudioError::UnsupportedProperty(PropertyId::from_bytes(*b"xxxx"));
        assert_eq!(err.to_string(), "Unsupported property 'xxxx'");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(CoreAudioError::InvalidHandle.status().to_string(), "'dta?'");
        assert_eq!(
            CoreAudioError::InvalidInput("abc".into()).status().to_string(),
            "'fmt?'"
        );
        assert_eq!(
            CoreAudioError::UnsupportedProperty(PropertyId(1)).status().to_string(),
            "'pty?'"
        );
        let err = CoreAudioError::SizeMismatch {
            id: PropertyId(1),
            expected: 4,
            actual: 8,
        };
        assert_eq!(err.status().to_string(), "'!siz'");
    }
}
