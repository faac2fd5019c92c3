//! Error types for the ChainMuse narrative graph workflow.
//!
//! Every external system (generation provider, content store, ledger) has its
//! own error kind with source-location tracking. [`ChainmuseError`] aggregates
//! them, and [`PipelineError`] tags a failure with the creation stage it
//! interrupted.

mod config;
mod content;
mod generation;
mod ledger;
mod pipeline;

pub use config::ConfigError;
pub use content::{ContentError, ContentErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use ledger::{LedgerError, LedgerErrorKind};
pub use pipeline::{FailureKind, PipelineError, PipelineStage};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ChainmuseErrorKind {
    /// Narrative generation error
    #[display("{}", _0)]
    Generation(GenerationError),
    /// Content store error
    #[display("{}", _0)]
    Content(ContentError),
    /// Ledger error
    #[display("{}", _0)]
    Ledger(LedgerError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
}

/// ChainMuse error with kind discrimination.
#[derive(Debug)]
pub struct ChainmuseError(Box<ChainmuseErrorKind>);

impl ChainmuseError {
    /// Create a new error from a kind.
    pub fn new(kind: ChainmuseErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ChainmuseErrorKind {
        &self.0
    }
}

impl std::fmt::Display for ChainmuseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChainMuse Error: {}", self.0)
    }
}

impl std::error::Error for ChainmuseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ChainmuseErrorKind::Generation(e) => Some(e),
            ChainmuseErrorKind::Content(e) => Some(e),
            ChainmuseErrorKind::Ledger(e) => Some(e),
            ChainmuseErrorKind::Config(e) => Some(e),
        }
    }
}

// Generic From implementation for any type that converts to ChainmuseErrorKind
impl<T> From<T> for ChainmuseError
where
    T: Into<ChainmuseErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for ChainMuse operations.
pub type ChainmuseResult<T> = std::result::Result<T, ChainmuseError>;
