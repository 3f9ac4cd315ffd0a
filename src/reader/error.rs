use crate::error::{MalformedError, UnsupportedError};
use thiserror::Error;

#[doc = r#"
A decode failure, carrying the byte offset at which it was raised.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// Structurally invalid input.
    #[error("{0}")]
    Malformed(#[from] MalformedError),
    /// Recognized but unsupported input.
    #[error("{0}")]
    Unsupported(#[from] UnsupportedError),
}

impl ReaderError {
    /// Create a reader error from a position and kind.
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the error kind of the reader.
    pub const fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// True if the input was structurally invalid.
    pub const fn is_malformed(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Malformed(_))
    }

    /// True if the input used a recognized but unsupported feature.
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Unsupported(_))
    }
}

/// The read result type (see [`ReaderError`]).
pub type ReadResult<T> = Result<T, ReaderError>;
