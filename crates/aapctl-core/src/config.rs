// ── Runtime connection configuration ──
//
// These types describe *how* to reach one controller. They carry credential
// data and connection tuning, but never touch disk or the environment.
// Callers construct a `ControllerConfig` and hand it to a `Reconciler`.

use std::path::PathBuf;
use std::time::Duration;

use aapctl_api::{Auth, ControllerClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// How to authenticate with a controller.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// OAuth2 or personal access token (preferred).
    Token(SecretString),
    /// HTTP basic auth.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// No credentials.
    Anonymous,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller host URL (e.g., `https://aap.example.com`), without the API root.
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Deadline for each request/response exchange.
    pub timeout: Duration,
}

impl ControllerConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Build the CRUD client described by this configuration.
    pub fn build_client(&self) -> Result<ControllerClient, CoreError> {
        let auth = match &self.auth {
            AuthCredentials::Token(token) => Auth::Bearer(token.clone()),
            AuthCredentials::Credentials { username, password } => Auth::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            AuthCredentials::Anonymous => Auth::None,
        };
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: self.timeout,
        };
        Ok(ControllerClient::new(&self.url, &auth, &transport)?)
    }
}
