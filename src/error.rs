//! Error types for tagwire.

use std::panic::Location;

use thiserror::Error;

/// Error taxonomy shared by the codec and the error handler callback.
///
/// `None` is the initial state of [`Codec::last_error`](crate::Codec::last_error);
/// every other kind marks a terminal failure of the current top-level
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// No error has occurred.
    #[error("no error")]
    None,

    /// Expected wire tag differs from the observed tag.
    #[error("type mismatch")]
    TypeMismatch,

    /// The transport reported short or failed I/O.
    #[error("stream error")]
    StreamError,

    /// A size prefix exceeds the receiving buffer capacity.
    #[error("string too long")]
    StringTooLong,

    /// An encoded collection or record payload exceeds 65,535.
    #[error("size overflow")]
    SizeOverflow,

    /// Malformed framing, including oversized payloads and bad code units.
    #[error("invalid data")]
    Invalid,

    /// The source was exhausted while more input was expected.
    #[error("end of stream")]
    EndOfStream,
}

/// Error returned by codec operations.
///
/// Carries the [`ErrorKind`] plus the library-internal site that detected
/// the failure. The site is advisory, intended for debugging the codec
/// itself, and matches the `(kind, line, file)` arguments passed to the
/// error handler.
#[derive(Debug, Clone, Copy, Error)]
#[error("{kind} at {file}:{line}")]
pub struct CodecError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Source file inside the codec that raised the error.
    pub file: &'static str,
    /// Line inside `file` that raised the error.
    pub line: u32,
}

impl CodecError {
    /// Create an error recording the caller's location as the raise site.
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        let site = Location::caller();
        Self {
            kind,
            file: site.file(),
            line: site.line(),
        }
    }

    /// The error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Result type alias using [`CodecError`].
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_site() {
        let err = CodecError::new(ErrorKind::TypeMismatch);
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
    }

    #[test]
    fn test_error_display_contains_kind_and_site() {
        let err = CodecError::new(ErrorKind::EndOfStream);
        let text = err.to_string();
        assert!(text.contains("end of stream"));
        assert!(text.contains("error.rs"));
    }
}
