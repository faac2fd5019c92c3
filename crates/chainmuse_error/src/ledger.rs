//! Ledger minting and query error types.

/// Ledger error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LedgerErrorKind {
    /// The ledger refused or failed to execute a mint transaction
    #[display("Mint rejected: {}", _0)]
    MintRejected(String),
    /// Execution succeeded but no created node could be found in the effects
    #[display("Receipt parse error: {}", _0)]
    ReceiptParse(String),
    /// The referenced parent node does not exist on the ledger
    #[display("Invalid parent node: {}", _0)]
    InvalidParent(String),
    /// Node or event queries could not be served
    #[display("Ledger query unavailable: {}", _0)]
    QueryUnavailable(String),
    /// Signing key could not be loaded or used
    #[display("Signer error: {}", _0)]
    Signer(String),
    /// RPC transport failure before the ledger saw the request
    #[display("Ledger transport error: {}", _0)]
    Transport(String),
    /// Ledger did not answer within the configured timeout
    #[display("Ledger call timed out after {}s", _0)]
    Timeout(u64),
}

/// Ledger error with source location tracking.
///
/// # Examples
///
/// ```
/// use chainmuse_error::{LedgerError, LedgerErrorKind};
///
/// let err = LedgerError::new(LedgerErrorKind::InvalidParent("0x2a".into()));
/// assert!(format!("{}", err).contains("0x2a"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    /// The kind of error that occurred
    pub kind: LedgerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new LedgerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
