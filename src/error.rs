//! Error types for the docmark library.

use std::io;
use thiserror::Error;

/// Result type alias for docmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Required support files or assets are absent.
    #[error("Environment error: {0}")]
    Environment(String),

    /// Missing or invalid required input (arguments, URL scheme).
    #[error("Invalid input: {0}")]
    Input(String),

    /// Host name could not be resolved.
    #[error("Network error: could not resolve host ({0})")]
    DnsFailure(String),

    /// Connection to the remote host was refused.
    #[error("Connection error: connection refused ({0})")]
    ConnectionRefused(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: request failed ({url})")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Retrieval failed for a reason not covered by the cases above.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The source document is malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A single content unit (page or section) could not be extracted.
    ///
    /// Recoverable for packaged-document sections (the unit is skipped with
    /// a warning); fatal for paginated-document pages.
    #[error("Failed to extract unit {unit}: {reason}")]
    UnitExtraction {
        /// Identifier of the failing unit (section id or page number)
        unit: String,
        /// Cause description
        reason: String,
    },

    /// Error while rendering Markdown.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error may be absorbed at a section boundary.
    ///
    /// Only unit-extraction failures qualify; everything else propagates to
    /// the top level.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnitExtraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DnsFailure("https://example.invalid".into());
        assert_eq!(
            err.to_string(),
            "Network error: could not resolve host (https://example.invalid)"
        );

        let err = Error::HttpStatus {
            status: 404,
            url: "https://example.com/missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404: request failed (https://example.com/missing)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_recoverable() {
        let err = Error::UnitExtraction {
            unit: "chapter-3".into(),
            reason: "broken markup".into(),
        };
        assert!(err.is_recoverable());
        assert!(!Error::Parse("bad".into()).is_recoverable());
    }
}
