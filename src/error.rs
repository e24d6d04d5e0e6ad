//! Error types for PDF export
//!
//! Only failures raised while the primary renderer runs are recovered (by
//! switching to the raster fallback). Everything raised by the fallback, or
//! while saving the final artifact, reaches the caller.
//!
//! There is no timeout around raster capture: a capture that never returns
//! blocks its call indefinitely.

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a document to PDF
#[derive(Error, Debug)]
pub enum Error {
    /// The primary converter could not be loaded or launched
    #[error("Primary renderer unavailable: {0}")]
    PrimaryUnavailable(String),

    /// The primary converter loaded but failed during conversion
    #[error("Primary conversion failed: {0}")]
    PrimaryConversion(String),

    /// Raster capture of the target failed
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Page placement, encoding or saving failed
    #[error("PDF assembly failed: {0}")]
    AssemblyError(String),

    /// Invalid configuration (degenerate page geometry and friends)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error outside of artifact assembly
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error belongs to the primary stage and may be recovered by
    /// running the fallback.
    pub fn is_primary_failure(&self) -> bool {
        matches!(self, Error::PrimaryUnavailable(_) | Error::PrimaryConversion(_))
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::PrimaryConversion(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::AssemblyError(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::AssemblyError(format!("image encoding failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_failures_are_recoverable() {
        assert!(Error::PrimaryUnavailable("missing".into()).is_primary_failure());
        assert!(Error::PrimaryConversion("boom".into()).is_primary_failure());
        assert!(!Error::CaptureError("detached".into()).is_primary_failure());
        assert!(!Error::AssemblyError("disk full".into()).is_primary_failure());
    }

    #[test]
    fn display_includes_context() {
        let e = Error::ConfigError("usable height is 0mm".into());
        assert_eq!(e.to_string(), "Invalid configuration: usable height is 0mm");
    }
}
