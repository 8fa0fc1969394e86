//! Error types for the season_colors library

use thiserror::Error;

/// Result type alias for season_colors operations
pub type Result<T> = std::result::Result<T, DiagnosisError>;

/// Error taxonomy for the diagnosis pipeline.
///
/// Every failure is terminal for the current diagnosis: nothing is retried,
/// no partial result is returned, and the caller removes the input image on
/// the way out.
#[derive(Error, Debug)]
pub enum DiagnosisError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A model artifact could not be loaded or failed validation
    #[error("Failed to load model: {message}")]
    ModelLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The detector returned zero faces
    #[error("No face detected in the input image")]
    NoFaceDetected,

    /// A facial region retained no pixels after skin masking
    #[error("Region '{region}' is empty after skin masking")]
    EmptyRegion { region: String },

    /// A region retained fewer pixels than its clustering step needs
    #[error("Region '{region}' has {available} pixels, clustering needs at least {required}")]
    InsufficientPixels {
        region: String,
        required: usize,
        available: usize,
    },

    /// Generic processing error
    #[error("Processing error: {0}")]
    Processing(String),
}

impl DiagnosisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a model load error with context
    pub fn model_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ModelLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a model load error from a bare message, for libraries whose
    /// error types cannot be carried as a source
    pub fn model_load_msg(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            DiagnosisError::ImageLoad { .. } => {
                "Could not load the photo. Please check the file format and try again.".to_string()
            }
            DiagnosisError::ModelLoad { .. } => {
                "A model file is missing or damaged. Please reinstall the model assets.".to_string()
            }
            DiagnosisError::NoFaceDetected => {
                "Could not find a face in the photo. Please use a clear, front-facing portrait."
                    .to_string()
            }
            DiagnosisError::EmptyRegion { .. } | DiagnosisError::InsufficientPixels { .. } => {
                "Could not read skin tones from the photo. Please retake it in even lighting."
                    .to_string()
            }
            _ => "Diagnosis failed. Please try with a different photo.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiagnosisError::NoFaceDetected;
        assert_eq!(err.to_string(), "No face detected in the input image");

        let err = DiagnosisError::EmptyRegion {
            region: "lips".to_string(),
        };
        assert!(err.to_string().contains("lips"));

        let err = DiagnosisError::InsufficientPixels {
            region: "cheeks".to_string(),
            required: 10,
            available: 3,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_source_chaining() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DiagnosisError::image_load("opening photo.jpg", io);
        assert!(err.source().is_some());

        let bare = DiagnosisError::model_load_msg("detector model");
        assert!(bare.source().is_none());
    }

    #[test]
    fn test_user_messages_are_nonempty() {
        let errors = [
            DiagnosisError::NoFaceDetected,
            DiagnosisError::Processing("x".into()),
            DiagnosisError::EmptyRegion {
                region: "nose".into(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
