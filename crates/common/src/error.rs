use thiserror::Error;

/// Failure taxonomy shared by the scoring services. The first two variants
/// are outcomes of a scoring run itself; the rest are collaborator
/// failures around it.
#[derive(Debug, Error)]
pub enum BlinkError {
    /// The ledger is too short to score; carries the observed span so
    /// callers can report it.
    #[error("insufficient history ({observed_days} days observed)")]
    InsufficientHistory { observed_days: i64 },

    /// The deterministic engine broke an arithmetic invariant.
    #[error("scoring engine failure: {0}")]
    Scoring(String),

    #[error("bad configuration: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Database(String),

    #[error("no such record: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

pub type BlinkResult<T> = Result<T, BlinkError>;
