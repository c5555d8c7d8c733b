use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `engram`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum EngramError {
    // ── Store ───────────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Judge ───────────────────────────────────────────────────────────
    #[error("judge: {0}")]
    Judge(#[from] JudgeError),

    // ── Completion provider ─────────────────────────────────────────────
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Store errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// ─── Judge errors ────────────────────────────────────────────────────────────

/// Judgment failures stay internal: the judge degrades to its rule verdict
/// rather than surfacing these to the turn-level caller.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("completion timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("unparseable judgment: {0}")]
    Unparseable(String),

    #[error("low-confidence judgment: {0}")]
    LowConfidence(f64),
}

// ─── Provider errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("api key not configured")]
    MissingApiKey,

    #[error("empty completion response")]
    EmptyResponse,
}

// ─── Convenience re-exports ──────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, EngramError>;
