// Authenticated HTTP transport for the controller REST API.
//
// Owns the `reqwest::Client` (TLS trust, timeout, auth headers) and
// performs exactly one HTTP exchange per call. Status interpretation
// lives in `classify`; this module only moves bytes.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Path prefix of the controller API, appended to the host URL.
pub const API_ROOT: &str = "/api/controller/v2";

const USER_AGENT: &str = concat!("aapctl/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (the controller's `insecure` switch).
    DangerAcceptInvalid,
}

/// How requests authenticate against the controller.
#[derive(Debug, Clone)]
pub enum Auth {
    /// OAuth2 / personal access token, sent as `Authorization: Bearer`.
    Bearer(SecretString),
    /// HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
    /// No credentials (useful against mock servers).
    None,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Overall deadline for a single request/response exchange.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Status and body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// One authenticated connection to a controller.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_root: Url,
    auth: Auth,
}

impl HttpTransport {
    /// Build a transport for the controller at `base_url` (e.g. `https://aap.example.com`).
    pub fn new(base_url: &Url, auth: &Auth, config: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = config.build_client(headers)?;
        let mut transport = Self::from_reqwest(base_url, http)?;
        transport.auth = auth.clone();
        Ok(transport)
    }

    /// Wrap an existing `reqwest::Client` without attaching credentials.
    pub fn from_reqwest(base_url: &Url, http: reqwest::Client) -> Result<Self, Error> {
        let host = base_url.as_str().trim_end_matches('/');
        let api_root = Url::parse(&format!("{host}{API_ROOT}"))?;
        Ok(Self {
            http,
            api_root,
            auth: Auth::None,
        })
    }

    /// The API root every resource path is appended to.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Apply the configured credentials to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => builder.bearer_auth(token.expose_secret()),
            Auth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            Auth::None => builder,
        }
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        let root = self.api_root.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{root}{path}"))?)
    }

    /// Perform one HTTP exchange and return the raw status and body.
    ///
    /// Only connection-level failures (refused, DNS, TLS, deadline) surface
    /// as errors here; any HTTP status is returned as-is.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut request = self.apply_auth(self.http.request(method.clone(), url));
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|source| Error::Transport {
            method: method.clone(),
            path: path.to_owned(),
            source,
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|source| Error::Transport {
            method,
            path: path.to_owned(),
            source,
        })?;

        trace!(status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}
