use thiserror::Error;

/// Top-level error type for the `netwatch-probe` crate.
///
/// Only the speed test surfaces these to callers. Reachability rounds
/// never fail as a whole: per-endpoint errors are counted, not returned.
/// `netwatch-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be constructed (bad CA file, TLS backend).
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    // ── Measurement ─────────────────────────────────────────────────
    /// The download endpoint answered with an empty body, so no
    /// throughput can be computed.
    #[error("Speed test payload was empty")]
    EmptyPayload,
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Map a `reqwest` error, promoting timeouts to [`Error::Timeout`].
    pub(crate) fn from_send(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Transport(err)
        }
    }
}
