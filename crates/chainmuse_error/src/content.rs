//! Content store error types.

/// Kinds of content store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContentErrorKind {
    /// The store could not durably accept a payload
    #[display("Content store unavailable: {}", _0)]
    StoreUnavailable(String),
    /// Every retrieval endpoint failed for a reference
    #[display(
        "Content {} unavailable after {} endpoint attempt(s)",
        content_ref,
        attempts
    )]
    ContentUnavailable {
        /// Reference that could not be resolved
        content_ref: String,
        /// Number of endpoints tried
        attempts: usize,
    },
    /// A single retrieval endpoint failed
    #[display("Endpoint {} failed: {}", endpoint, message)]
    Endpoint {
        /// Endpoint name
        endpoint: String,
        /// Failure description
        message: String,
    },
    /// Payload could not be encoded or decoded
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Payload decoded but is not a valid content record
    #[display("Invalid content record: {}", _0)]
    InvalidRecord(String),
}

/// Content store error with location tracking.
///
/// # Examples
///
/// ```
/// use chainmuse_error::{ContentError, ContentErrorKind};
///
/// let err = ContentError::new(ContentErrorKind::StoreUnavailable("pinning down".into()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Content Error: {} at line {} in {}", kind, line, file)]
pub struct ContentError {
    /// The kind of error that occurred
    pub kind: ContentErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ContentError {
    /// Create a new content error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<serde_json::Error> for ContentError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ContentError::new(ContentErrorKind::Serialization(err.to_string()))
    }
}
