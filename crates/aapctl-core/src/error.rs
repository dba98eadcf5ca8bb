// ── Core error types ──
//
// Errors surfaced by the reconciliation engine. Every remote failure keeps
// the operation (`METHOD /path`) and the literal response body so callers
// can report it without re-running anything. The engine never retries;
// `is_retryable()` tells the caller whether its own policy may.

use aapctl_api::{ErrorClass, ResourceId, ResourceKind};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("{operation} failed: {reason}")]
    Transport {
        operation: String,
        reason: String,
        /// Connect or deadline failure, safe to retry.
        transient: bool,
    },

    #[error("{operation} failed: not found: {body}")]
    NotFound { operation: String, body: String },

    #[error("{operation} failed (HTTP {status}): {body}")]
    Remote {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation} returned an unexpected body: {message}: {body}")]
    Decode {
        operation: String,
        message: String,
        body: String,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed for {operation}: {message}")]
    Validation { operation: String, message: String },

    #[error("Invalid reference in {kind}.{field}: \"{raw}\" is not an object id")]
    InvalidReference {
        kind: ResourceKind,
        field: String,
        raw: String,
    },

    #[error("{kind} is not managed (no remote identity)")]
    NotManaged { kind: ResourceKind },

    #[error("{kind} is already managed as id {id}")]
    AlreadyManaged { kind: ResourceKind, id: ResourceId },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether a caller-side retry of the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { transient, .. } => *transient,
            Self::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Remote { status: 409, .. })
    }

    /// Literal response body, when the controller answered.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::NotFound { body, .. } | Self::Remote { body, .. } | Self::Decode { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aapctl_api::Error> for CoreError {
    fn from(err: aapctl_api::Error) -> Self {
        let transient = err.class() == ErrorClass::Transient;
        let operation = err.operation().unwrap_or_default();
        match err {
            aapctl_api::Error::Transport { source, .. } => CoreError::Transport {
                operation,
                reason: source.to_string(),
                transient,
            },
            aapctl_api::Error::NotFound { body, .. } => CoreError::NotFound { operation, body },
            aapctl_api::Error::Remote { status, body, .. } => CoreError::Remote {
                operation,
                status,
                body,
            },
            aapctl_api::Error::Decode { message, body, .. } => CoreError::Decode {
                operation,
                message,
                body,
            },
            aapctl_api::Error::InvalidRequest { message, .. } => {
                CoreError::Validation { operation, message }
            }
            aapctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aapctl_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}
