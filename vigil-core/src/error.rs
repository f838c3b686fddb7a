//! Error types for Vigil

use thiserror::Error;

/// Result type alias using VigilError
pub type Result<T> = std::result::Result<T, VigilError>;

/// Main error type for Vigil operations
#[derive(Debug, Error)]
pub enum VigilError {
    /// Camera or screen device failed to open or read. Fatal for the
    /// capture loop: the device is assumed disconnected or busy.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Writing or appending an artifact failed. The frame is lost but
    /// the capture loop continues.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A raw pixel buffer did not match its declared dimensions
    #[error("frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    BadFrame { expected: usize, actual: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<VigilError>,
    },
}

impl VigilError {
    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// A short operator-facing hint for common failure classes, if one exists
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DeviceUnavailable(_) => {
                Some("Check that the camera is connected and not in use by another program")
            }
            Self::Encode(_) => Some("Chunked recording requires an ffmpeg binary on PATH"),
            Self::Config(_) => Some("Run `vigil config path` to locate your config.toml"),
            Self::WithContext { source, .. } => source.user_hint(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

// Conversions from external error types

impl From<nokhwa::NokhwaError> for VigilError {
    fn from(err: nokhwa::NokhwaError) -> Self {
        Self::DeviceUnavailable(err.to_string())
    }
}

impl From<xcap::XCapError> for VigilError {
    fn from(err: xcap::XCapError) -> Self {
        Self::DeviceUnavailable(err.to_string())
    }
}

impl From<image::ImageError> for VigilError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err.to_string())
    }
}
