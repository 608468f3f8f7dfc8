use thiserror::Error;

/// Client-side error taxonomy for arena ledger operations.
///
/// Event/log decode failures are deliberately not represented here: they
/// degrade to an unknown strategy id, never to an error.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// No signing session connected; surfaced before any network call.
    #[error("no signing session connected")]
    Unauthenticated,

    /// The arena contract address is not configured.
    #[error("arena contract not configured")]
    Unconfigured,

    #[error("strategy {0} not found")]
    NotFound(u64),

    /// The ledger reverted the transaction; the reason string is the
    /// ledger's own, forwarded verbatim.
    #[error("{0}")]
    LedgerRejected(String),

    /// Transport-level failure. Retry is left to the caller.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("strategy {0} is already verified")]
    AlreadyVerified(u64),

    /// Zero trades is not a valid verified state; the one input problem
    /// that blocks submission instead of substituting a default.
    #[error("trades count must be at least 1")]
    InvalidTradesCount,
}
