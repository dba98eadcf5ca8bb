//! Shared configuration for aapctl consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `aapctl_core::ControllerConfig`. The controller's
//! classic environment variables (`AAP_HOST`, `AAP_USERNAME`,
//! `AAP_PASSWORD`, `AAP_TOKEN`, `AAP_INSECURE`) override the active profile,
//! so a config file is optional.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use aapctl_core::{AuthCredentials, ControllerConfig, TlsVerification};

const KEYRING_SERVICE: &str = "aapctl";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host URL (e.g., "https://aap.example.com").
    #[serde(default)]
    pub host: String,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password for basic auth (plaintext; prefer keyring or `AAP_PASSWORD`).
    pub password: Option<String>,

    /// OAuth2 / personal access token (plaintext; prefer keyring or `AAP_TOKEN`).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aapctl", "aapctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aapctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and `AAP_`-prefixed variables
/// (`AAP_DEFAULT_PROFILE`, `AAP_DEFAULTS__TIMEOUT`, ...) still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AAP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Environment overrides ───────────────────────────────────────────

/// Apply `AAP_HOST`, `AAP_USERNAME` and `AAP_INSECURE` from the process
/// environment on top of `profile`.
pub fn apply_env_overrides(profile: &mut Profile) -> Result<(), ConfigError> {
    apply_overrides_from(profile, |key| std::env::var(key).ok())
}

/// Same as [`apply_env_overrides`], reading variables through `lookup`.
pub fn apply_overrides_from(
    profile: &mut Profile,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(host) = lookup("AAP_HOST").filter(|h| !h.is_empty()) {
        profile.host = host;
    }
    if let Some(username) = lookup("AAP_USERNAME").filter(|u| !u.is_empty()) {
        profile.username = Some(username);
    }
    if let Some(raw) = lookup("AAP_INSECURE") {
        profile.insecure = Some(parse_bool("AAP_INSECURE", &raw)?);
    }
    Ok(())
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_secret(profile_name: &str, field: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{field}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Store a profile secret (`token` or `password`) in the system keyring.
pub fn store_keyring_secret(
    profile_name: &str,
    field: &str,
    secret: &str,
) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{field}"))?;
    entry.set_password(secret)?;
    Ok(())
}

/// Resolve a bearer token: env var → system keyring → plaintext in config.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_from(profile, profile_name, |key| std::env::var(key).ok(), keyring_secret)
}

/// Same as [`resolve_token`], reading variables through `env` and stored
/// secrets through `keyring`.
pub fn resolve_token_from(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str, &str) -> Option<SecretString>,
) -> Option<SecretString> {
    let env_name = profile.token_env.as_deref().unwrap_or("AAP_TOKEN");
    if let Some(val) = env(env_name).filter(|v| !v.is_empty()) {
        return Some(SecretString::from(val));
    }

    if let Some(secret) = keyring(profile_name, "token") {
        return Some(secret);
    }

    profile
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
}

/// Resolve a basic-auth password: `AAP_PASSWORD` → system keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_password_from(profile, profile_name, |key| std::env::var(key).ok(), keyring_secret)
}

/// Same as [`resolve_password`] with injected lookups.
pub fn resolve_password_from(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str, &str) -> Option<SecretString>,
) -> Option<SecretString> {
    if let Some(pw) = env("AAP_PASSWORD").filter(|v| !v.is_empty()) {
        return Some(SecretString::from(pw));
    }

    if let Some(secret) = keyring(profile_name, "password") {
        return Some(secret);
    }

    profile
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
}

/// Token when one resolves, else basic auth when both parts are present.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> AuthCredentials {
    resolve_auth_from(profile, profile_name, |key| std::env::var(key).ok(), keyring_secret)
}

/// Same as [`resolve_auth`] with injected lookups.
pub fn resolve_auth_from(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str, &str) -> Option<SecretString>,
) -> AuthCredentials {
    if let Some(token) = resolve_token_from(profile, profile_name, &env, &keyring) {
        return AuthCredentials::Token(token);
    }
    let username = profile.username.clone().filter(|u| !u.is_empty());
    match (username, resolve_password_from(profile, profile_name, &env, &keyring)) {
        (Some(username), Some(password)) => AuthCredentials::Credentials { username, password },
        _ => {
            warn!(profile = profile_name, "no credentials configured, requests are anonymous");
            AuthCredentials::Anonymous
        }
    }
}

// ── ControllerConfig assembly ───────────────────────────────────────

/// Build a `ControllerConfig` from a profile and the global defaults.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "AAP host must be configured".into(),
        });
    }
    let url: url::Url = profile.host.parse().map_err(|_| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {}", profile.host),
    })?;

    let auth = resolve_auth(profile, profile_name);

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ControllerConfig {
        url,
        auth,
        tls,
        timeout,
    })
}

/// Pick a profile (named, or the config's default), apply environment
/// overrides, and build its `ControllerConfig`.
///
/// With no matching profile in the file, the default profile is built
/// from the environment alone. An explicitly named profile must exist.
pub fn controller_config(
    cfg: &Config,
    profile_name: Option<&str>,
) -> Result<ControllerConfig, ConfigError> {
    let name = profile_name.unwrap_or_else(|| cfg.active_profile_name());
    let mut profile = match (cfg.profiles.get(name), profile_name) {
        (Some(p), _) => p.clone(),
        (None, None) => Profile::default(),
        (None, Some(_)) => {
            return Err(ConfigError::UnknownProfile {
                profile: name.into(),
            });
        }
    };
    apply_env_overrides(&mut profile)?;
    profile_to_controller_config(&profile, name, &cfg.defaults)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn profile(host: &str) -> Profile {
        Profile {
            host: host.into(),
            ..Profile::default()
        }
    }

    fn env_of<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    fn no_keyring(_: &str, _: &str) -> Option<SecretString> {
        None
    }

    fn basic_profile() -> Profile {
        Profile {
            username: Some("admin".into()),
            password: Some("file-pw".into()),
            ..profile("https://aap.example.com")
        }
    }

    #[test]
    fn missing_host_is_rejected() {
        let err =
            profile_to_controller_config(&profile(""), "default", &Defaults::default()).unwrap_err();
        assert!(err.to_string().contains("AAP host must be configured"), "{err}");
    }

    #[test]
    fn invalid_host_is_rejected() {
        let err = profile_to_controller_config(&profile("not a url"), "default", &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }

    #[test]
    fn insecure_and_timeout_fall_back_to_defaults() {
        let defaults = Defaults {
            insecure: true,
            timeout: 12,
        };
        let cfg =
            profile_to_controller_config(&profile("https://aap.example.com"), "t", &defaults)
                .unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(12));
    }

    #[test]
    fn ca_cert_used_when_verifying() {
        let p = Profile {
            ca_cert: Some("/etc/pki/aap-ca.pem".into()),
            insecure: Some(false),
            ..profile("https://aap.example.com")
        };
        let cfg = profile_to_controller_config(&p, "t", &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::CustomCa("/etc/pki/aap-ca.pem".into()));
    }

    #[test]
    fn env_overrides_win_over_profile() {
        let mut p = Profile {
            username: Some("file-user".into()),
            ..profile("https://file.example.com")
        };
        let env: HashMap<&str, &str> = [
            ("AAP_HOST", "https://env.example.com"),
            ("AAP_USERNAME", "env-user"),
            ("AAP_INSECURE", "true"),
        ]
        .into_iter()
        .collect();
        apply_overrides_from(&mut p, |k| env.get(k).map(|v| (*v).to_owned())).unwrap();

        assert_eq!(p.host, "https://env.example.com");
        assert_eq!(p.username.as_deref(), Some("env-user"));
        assert_eq!(p.insecure, Some(true));
    }

    #[test]
    fn empty_env_values_do_not_clear_profile() {
        let mut p = profile("https://file.example.com");
        apply_overrides_from(&mut p, |k| (k == "AAP_HOST").then(String::new)).unwrap();
        assert_eq!(p.host, "https://file.example.com");
    }

    #[test]
    fn malformed_insecure_flag_is_rejected() {
        let mut p = profile("https://aap.example.com");
        let err = apply_overrides_from(&mut p, |k| (k == "AAP_INSECURE").then(|| "maybe".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let err = controller_config(&Config::default(), Some("prod")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { .. }));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                username: Some("admin".into()),
                timeout: Some(60),
                ..profile("https://aap.example.com")
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let p = &loaded.profiles["default"];
        assert_eq!(p.host, "https://aap.example.com");
        assert_eq!(p.username.as_deref(), Some("admin"));
        assert_eq!(p.timeout, Some(60));
        assert_eq!(loaded.active_profile_name(), "default");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.profiles.is_empty());
        assert_eq!(loaded.defaults.timeout, 30);
    }

    // ── Credential chains ───────────────────────────────────────────

    #[test]
    fn env_token_wins_over_basic_credentials() {
        let auth = resolve_auth_from(
            &basic_profile(),
            "default",
            env_of(&[("AAP_TOKEN", "env-token"), ("AAP_PASSWORD", "env-pw")]),
            no_keyring,
        );
        match auth {
            AuthCredentials::Token(token) => assert_eq!(token.expose_secret(), "env-token"),
            other => panic!("expected Token, got {other:?}"),
        }
    }

    #[test]
    fn env_password_wins_over_plaintext() {
        let auth = resolve_auth_from(
            &basic_profile(),
            "default",
            env_of(&[("AAP_PASSWORD", "env-pw")]),
            no_keyring,
        );
        match auth {
            AuthCredentials::Credentials { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "env-pw");
            }
            other => panic!("expected Credentials, got {other:?}"),
        }
    }

    #[test]
    fn keyring_sits_between_env_and_plaintext() {
        let keyring = |name: &str, field: &str| {
            (name == "prod" && field == "password").then(|| SecretString::from("ring-pw".to_string()))
        };

        let pw = resolve_password_from(&basic_profile(), "prod", env_of(&[]), keyring).unwrap();
        assert_eq!(pw.expose_secret(), "ring-pw");

        let pw = resolve_password_from(
            &basic_profile(),
            "prod",
            env_of(&[("AAP_PASSWORD", "env-pw")]),
            keyring,
        )
        .unwrap();
        assert_eq!(pw.expose_secret(), "env-pw");

        let pw = resolve_password_from(&basic_profile(), "dev", env_of(&[]), keyring).unwrap();
        assert_eq!(pw.expose_secret(), "file-pw");
    }

    #[test]
    fn token_env_names_the_variable_to_read() {
        let p = Profile {
            token: Some("file-token".into()),
            token_env: Some("CI_AAP_TOKEN".into()),
            ..profile("https://aap.example.com")
        };

        let token = resolve_token_from(
            &p,
            "default",
            env_of(&[("AAP_TOKEN", "ignored"), ("CI_AAP_TOKEN", "ci-token")]),
            no_keyring,
        )
        .unwrap();
        assert_eq!(token.expose_secret(), "ci-token");

        let token =
            resolve_token_from(&p, "default", env_of(&[("AAP_TOKEN", "ignored")]), no_keyring)
                .unwrap();
        assert_eq!(token.expose_secret(), "file-token");
    }

    #[test]
    fn no_credentials_means_anonymous() {
        let p = Profile {
            username: Some("admin".into()),
            ..profile("https://aap.example.com")
        };
        let auth = resolve_auth_from(&p, "default", env_of(&[("AAP_TOKEN", "")]), no_keyring);
        assert!(matches!(auth, AuthCredentials::Anonymous), "{auth:?}");
    }
}
