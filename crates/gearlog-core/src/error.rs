//! Error types for the gearlog-core library.

use thiserror::Error;

/// Main error type for the gearlog library.
#[derive(Error, Debug)]
pub enum GearlogError {
    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR providers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No API credential is configured for the vision provider.
    #[error("vision API key not configured")]
    MissingCredential,

    /// The request to the vision service could not be sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The vision service answered with a non-success status.
    #[error("service returned status {status}: {message}")]
    Service { status: u16, message: String },

    /// The vision service answered, but the body was not understood.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A remote image URL could not be fetched.
    #[error("failed to fetch image: {0}")]
    ImageFetch(String),
}

/// Result type for the gearlog library.
pub type Result<T> = std::result::Result<T, GearlogError>;
