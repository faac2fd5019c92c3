//! Node-creation pipeline failures.

use crate::{ChainmuseError, ChainmuseErrorKind, ContentErrorKind, LedgerErrorKind};

/// Stage of the node-creation pipeline at which a request stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
pub enum PipelineStage {
    /// Best-effort fetch of the parent's content
    #[display("context_fetch")]
    ContextFetch,
    /// Narrative text generation
    #[display("generate")]
    Generate,
    /// Content record persistence
    #[display("persist_content")]
    PersistContent,
    /// Ledger mint transaction
    #[display("mint")]
    Mint,
}

/// Caller-facing failure taxonomy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
pub enum FailureKind {
    /// Generation adapter failed
    GenerationFailed,
    /// Content store could not persist the record
    StoreUnavailable,
    /// Content could not be retrieved from any endpoint
    ContentUnavailable,
    /// Ledger rejected the mint
    MintRejected,
    /// Mint executed but the created node could not be identified
    ReceiptParseError,
    /// Parent node does not exist
    InvalidParent,
    /// Ledger queries unavailable
    QueryUnavailable,
    /// Misconfiguration or other local failure
    Internal,
}

impl FailureKind {
    /// Classify an error into the caller-facing taxonomy.
    pub fn of(err: &ChainmuseError) -> Self {
        match err.kind() {
            ChainmuseErrorKind::Generation(_) => FailureKind::GenerationFailed,
            ChainmuseErrorKind::Content(e) => match &e.kind {
                ContentErrorKind::StoreUnavailable(_) => FailureKind::StoreUnavailable,
                ContentErrorKind::ContentUnavailable { .. }
                | ContentErrorKind::Endpoint { .. } => FailureKind::ContentUnavailable,
                ContentErrorKind::Serialization(_) | ContentErrorKind::InvalidRecord(_) => {
                    FailureKind::Internal
                }
            },
            ChainmuseErrorKind::Ledger(e) => match &e.kind {
                LedgerErrorKind::MintRejected(_)
                | LedgerErrorKind::Transport(_)
                | LedgerErrorKind::Timeout(_) => FailureKind::MintRejected,
                LedgerErrorKind::ReceiptParse(_) => FailureKind::ReceiptParseError,
                LedgerErrorKind::InvalidParent(_) => FailureKind::InvalidParent,
                LedgerErrorKind::QueryUnavailable(_) => FailureKind::QueryUnavailable,
                LedgerErrorKind::Signer(_) => FailureKind::Internal,
            },
            ChainmuseErrorKind::Config(_) => FailureKind::Internal,
        }
    }
}

/// A terminal failure of one node-creation request.
///
/// Carries the stage that failed and the underlying cause so the caller
/// can decide whether to issue a fresh request.
///
/// # Examples
///
/// ```
/// use chainmuse_error::{
///     FailureKind, GenerationError, GenerationErrorKind, PipelineError, PipelineStage,
/// };
///
/// let err = PipelineError::new(
///     PipelineStage::Generate,
///     GenerationError::new(GenerationErrorKind::EmptyResponse),
/// );
/// assert_eq!(err.stage(), PipelineStage::Generate);
/// assert_eq!(err.failure(), FailureKind::GenerationFailed);
/// ```
#[derive(Debug, derive_more::Display)]
#[display("Pipeline failed at stage '{}': {}", stage, source)]
pub struct PipelineError {
    stage: PipelineStage,
    source: ChainmuseError,
    orphaned_content: Option<String>,
}

impl PipelineError {
    /// Wrap a cause with the stage at which it occurred.
    pub fn new(stage: PipelineStage, source: impl Into<ChainmuseError>) -> Self {
        Self {
            stage,
            source: source.into(),
            orphaned_content: None,
        }
    }

    /// Record a content reference that was stored but never minted.
    pub fn with_orphaned_content(mut self, content_ref: impl Into<String>) -> Self {
        self.orphaned_content = Some(content_ref.into());
        self
    }

    /// Reference of stored content left unreferenced by a failed mint.
    pub fn orphaned_content(&self) -> Option<&str> {
        self.orphaned_content.as_deref()
    }

    /// Stage that failed.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Underlying cause.
    pub fn cause(&self) -> &ChainmuseError {
        &self.source
    }

    /// Failure tag of the underlying cause.
    pub fn failure(&self) -> FailureKind {
        FailureKind::of(&self.source)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
