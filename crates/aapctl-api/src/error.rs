use reqwest::Method;
use thiserror::Error;

/// Top-level error type for the `aapctl-api` crate.
///
/// Every variant produced by a remote call carries the HTTP method and
/// API path, and every variant produced after a response carries the raw
/// body text, so a failure can be correlated with controller-side logs
/// without re-running anything.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, TLS failure, or deadline expiry.
    #[error("{method} {path} failed: transport error: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// The controller answered 404 for the addressed object.
    #[error("{method} {path} failed: not found (HTTP 404): {body}")]
    NotFound {
        method: Method,
        path: String,
        body: String,
    },

    /// Any other non-2xx answer (validation, permission, conflict, server fault).
    #[error("{method} {path} failed (HTTP {status}): {body}")]
    Remote {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body did not match the expected resource shape.
    #[error("{method} {path} failed: could not decode response: {message}: {body}")]
    Decode {
        method: Method,
        path: String,
        message: String,
        body: String,
    },

    // ── Local ───────────────────────────────────────────────────────
    /// The request was refused before anything was sent.
    #[error("{method} {path} refused: {message}")]
    InvalidRequest {
        method: Method,
        path: String,
        message: String,
    },
}

/// Coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying by caller policy: connect/timeout failures, 5xx, 429.
    Transient,
    /// Retrying the same request cannot succeed.
    Permanent,
    /// The addressed object does not exist.
    NotFound,
    /// The controller reported a conflicting state (HTTP 409).
    Conflict,
}

impl Error {
    /// Classify this error into the small taxonomy callers act on.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Transport { source, .. } => {
                if source.is_timeout()
                    || source.is_connect()
                    || source.is_request()
                    || source.is_body()
                    || source.is_decode()
                {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Permanent
                }
            }
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Remote { status: 409, .. } => ErrorClass::Conflict,
            Self::Remote { status, .. } if *status >= 500 || *status == 429 => {
                ErrorClass::Transient
            }
            Self::Remote { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. }
            | Self::InvalidUrl(_)
            | Self::Tls(_) => ErrorClass::Permanent,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    /// Returns `true` if the controller reported a conflict.
    pub fn is_conflict(&self) -> bool {
        self.class() == ErrorClass::Conflict
    }

    /// HTTP status of the failed exchange, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Remote { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body, if a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::NotFound { body, .. } | Self::Remote { body, .. } | Self::Decode { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// The failed remote operation as `"METHOD /path"`.
    pub fn operation(&self) -> Option<String> {
        match self {
            Self::Transport { method, path, .. }
            | Self::NotFound { method, path, .. }
            | Self::Remote { method, path, .. }
            | Self::Decode { method, path, .. }
            | Self::InvalidRequest { method, path, .. } => Some(format!("{method} {path}")),
            Self::InvalidUrl(_) | Self::Tls(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16) -> Error {
        Error::Remote {
            method: Method::POST,
            path: "/organizations/".into(),
            status,
            body: r#"{"name":["This field is required."]}"#.into(),
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        assert_eq!(remote(400).class(), ErrorClass::Permanent);
        assert_eq!(remote(403).class(), ErrorClass::Permanent);
    }

    #[test]
    fn server_faults_and_throttling_are_transient() {
        assert!(remote(500).is_transient());
        assert!(remote(503).is_transient());
        assert!(remote(429).is_transient());
    }

    #[test]
    fn conflict_is_its_own_class() {
        assert!(remote(409).is_conflict());
        assert!(!remote(409).is_transient());
    }

    #[test]
    fn not_found_reports_status_and_body() {
        let err = Error::NotFound {
            method: Method::GET,
            path: "/inventories/9/".into(),
            body: r#"{"detail":"Not found."}"#.into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(r#"{"detail":"Not found."}"#));
    }

    #[test]
    fn display_names_operation_and_literal_body() {
        let msg = remote(400).to_string();
        assert!(msg.contains("POST /organizations/"), "got: {msg}");
        assert!(msg.contains(r#"{"name":["This field is required."]}"#), "got: {msg}");
        assert_eq!(remote(400).operation().as_deref(), Some("POST /organizations/"));
    }

    #[test]
    fn decode_errors_are_fatal() {
        let err = Error::Decode {
            method: Method::GET,
            path: "/projects/3/".into(),
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        };
        assert_eq!(err.class(), ErrorClass::Permanent);
        assert_eq!(err.body(), Some("<html>"));
    }

    #[test]
    fn decode_display_shows_literal_body() {
        let body = format!(r#"{{"name": "x", "description": "{}"#, "y".repeat(300));
        let err = Error::Decode {
            method: Method::GET,
            path: "/organizations/7/".into(),
            message: "EOF while parsing a string at line 1 column 330".into(),
            body: body.clone(),
        };
        let msg = err.to_string();
        assert!(msg.contains(&body), "got: {msg}");
    }
}
