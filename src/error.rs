use std::fmt;

#[derive(Debug)]
pub enum GenerateError {
    ConfigError(String),
    ValidationError(String),
    AnalysisError,
    ImageError,
    TransportError(Option<String>),
    ClipboardError(String),
}

impl GenerateError {
    /// Wraps a transport-level failure; an empty message collapses into the
    /// generic variant.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            GenerateError::TransportError(None)
        } else {
            GenerateError::TransportError(Some(message))
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            GenerateError::ValidationError(msg) => write!(f, "{}", msg),
            GenerateError::AnalysisError => {
                write!(f, "Failed to get a valid analysis from the AI.")
            }
            GenerateError::ImageError => write!(f, "Image generation failed."),
            GenerateError::TransportError(Some(msg)) => {
                write!(f, "AI generation failed: {}", msg)
            }
            GenerateError::TransportError(None) => {
                write!(f, "An unknown error occurred during AI generation.")
            }
            GenerateError::ClipboardError(msg) => write!(f, "Clipboard error: {}", msg),
        }
    }
}

impl std::error::Error for GenerateError {}

pub type Result<T> = std::result::Result<T, GenerateError>;
