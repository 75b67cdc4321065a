// ── Core error types ──
//
// Only explicit, caller-initiated operations return these (building a
// monitor, a manual speed test). Scheduled probe failures never surface
// as errors: they become data in the network state. The
// `From<netwatch_probe::Error>` impl translates transport-layer errors
// into domain variants so consumers never see raw reqwest errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Speed test failed: {reason}")]
    SpeedTestFailed { reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netwatch_probe::Error> for CoreError {
    fn from(err: netwatch_probe::Error) -> Self {
        match err {
            netwatch_probe::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::SpeedTestFailed {
                        reason: e.to_string(),
                    }
                }
            }
            netwatch_probe::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            netwatch_probe::Error::Client(message) => CoreError::Config { message },
            netwatch_probe::Error::EmptyPayload => CoreError::SpeedTestFailed {
                reason: "download payload was empty".into(),
            },
        }
    }
}
