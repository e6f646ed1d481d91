//! Shared configuration for the abflow CLI.
//!
//! TOML profiles, device credential files, credential resolution
//! (env + keyring + plaintext), and translation to
//! `abflow_core::DeviceConfig`. The CLI adds `GlobalOpts`-aware
//! overrides on top.

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
use url::Url;

use abflow_core::{DeviceConfig, ManagedApplications, TlsVerification};

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "abflow";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "ABFLOW_CONFIG";

/// Environment variable consulted first for the device password.
pub const PASSWORD_ENV: &str = "ABFLOW_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A device setting is missing or malformed.
    #[error("{message}")]
    Validation { message: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("invalid credentials file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_owned(),
    }
}

const MISSING_HOST: &str = "Could not find host in the configuration";
const BAD_PORT: &str = "The port attribute in the configuration is not an integer";
const MISSING_CREDENTIALS: &str = "Could not find user/password in the configuration";
const BAD_SSL_ENABLED: &str =
    "ssl_enabled option in configuration is optional and must be boolean if it exists";
const BAD_MANAGED_APPLICATIONS: &str =
    "Provided managed applications must be an array of strings if it exists";

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
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
    /// Look up a profile, listing the known ones on failure.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| {
            let mut available: Vec<String> = self.profiles.keys().cloned().collect();
            available.sort();
            ConfigError::ProfileNotFound {
                name: name.to_owned(),
                available,
            }
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// Port as written in a config: device files carry it as a string,
/// TOML users tend to write a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Port {
    Number(u64),
    Text(String),
}

impl Port {
    /// The port number, if it is all digits and fits in a `u16`.
    pub fn number(&self) -> Option<u16> {
        match self {
            Self::Number(n) => u16::try_from(*n).ok(),
            Self::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            Self::Text(_) => None,
        }
    }
}

/// A named BusinessFlow device profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Appliance hostname or IP.
    pub host: Option<String>,

    pub port: Option<Port>,

    pub user: Option<String>,

    /// Password (plaintext; prefer keyring or `ABFLOW_PASSWORD`).
    pub password: Option<String>,

    /// `false` selects plain HTTP. Defaults to `true`.
    pub ssl_enabled: Option<bool>,

    /// Allow-list of applications; absent or empty manages all.
    pub managed_applications: Option<Vec<String>>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Profile {
    /// Check the required device settings.
    ///
    /// The password is checked later, during credential resolution, since
    /// it may come from the environment or the keyring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(MISSING_HOST));
        }
        if self.port.as_ref().is_some_and(|p| p.number().is_none()) {
            return Err(invalid(BAD_PORT));
        }
        if self.user.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(MISSING_CREDENTIALS));
        }
        Ok(())
    }

    /// Appliance root URL: `https://host[:port]`, or `http://` when
    /// `ssl_enabled` is `false`.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        self.validate()?;
        let host = self.host.as_deref().unwrap_or_default();
        let scheme = if self.ssl_enabled.unwrap_or(true) {
            "https"
        } else {
            "http"
        };

        let mut url = Url::parse(&format!("{scheme}://{host}")).map_err(|e| {
            ConfigError::Validation {
                message: format!("invalid host '{host}': {e}"),
            }
        })?;
        if let Some(port) = self.port.as_ref().and_then(Port::number) {
            url.set_port(Some(port))
                .map_err(|()| invalid(BAD_PORT))?;
        }
        Ok(url)
    }

    pub fn managed(&self) -> ManagedApplications {
        self.managed_applications
            .clone()
            .map(ManagedApplications::from)
            .unwrap_or_default()
    }

    /// Parse a device credentials file (JSON object with `host`, `port`,
    /// `user`, `password`, `ssl_enabled`, `managed_applications`).
    pub fn from_credentials_json(raw: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let Some(map) = value.as_object() else {
            return Err(invalid(MISSING_HOST));
        };

        let string = |key: &str| map.get(key).and_then(|v| v.as_str()).map(str::to_owned);

        let port = match map.get("port") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(Port::Text(s.clone())),
            Some(serde_json::Value::Number(n)) => {
                Some(Port::Number(n.as_u64().ok_or_else(|| invalid(BAD_PORT))?))
            }
            Some(_) => return Err(invalid(BAD_PORT)),
        };

        let ssl_enabled = match map.get("ssl_enabled") {
            None => None,
            Some(serde_json::Value::Bool(b)) => Some(*b),
            Some(_) => return Err(invalid(BAD_SSL_ENABLED)),
        };

        let managed_applications = match map.get("managed_applications") {
            None => None,
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid(BAD_MANAGED_APPLICATIONS))?,
            ),
            Some(_) => return Err(invalid(BAD_MANAGED_APPLICATIONS)),
        };

        let profile = Self {
            host: string("host"),
            port,
            user: string("user"),
            password: string("password"),
            ssl_enabled,
            managed_applications,
            ..Self::default()
        };
        profile.validate()?;
        if profile.password.is_none() {
            return Err(invalid(MISSING_CREDENTIALS));
        }
        Ok(profile)
    }
}

/// Read a device credentials file from disk.
pub fn load_credentials_file(path: &Path) -> Result<Profile, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Profile::from_credentials_json(&raw)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `ABFLOW_CONFIG`, else platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "abflow", "abflow").map_or_else(
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
    p.push("abflow");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path`, then `ABFLOW_*` variables.
///
/// Nested keys use a double underscore, e.g.
/// `ABFLOW_PROFILES__PROD__HOST=algosec.example.com`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ABFLOW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the device password: `ABFLOW_PASSWORD`, then the system
/// keyring (`abflow` / `<profile>/password`), then the profile itself.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `DeviceConfig` from a profile and an already resolved password.
pub fn device_config(profile: &Profile, password: SecretString) -> Result<DeviceConfig, ConfigError> {
    let url = profile.base_url()?;
    let user = profile.user.clone().unwrap_or_default();

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(DeviceConfig {
        url,
        username: user,
        password,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        managed: profile.managed(),
    })
}

/// Build a `DeviceConfig` from a profile, resolving its password.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<DeviceConfig, ConfigError> {
    profile.validate()?;
    let password = resolve_password(profile, profile_name)?;
    device_config(profile, password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            host: Some("algosec.example.com".into()),
            user: Some("admin".into()),
            password: Some("secret".into()),
            ..Profile::default()
        }
    }

    fn message(err: ConfigError) -> String {
        err.to_string()
    }

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(
            profile().base_url().unwrap().as_str(),
            "https://algosec.example.com/"
        );
    }

    #[test]
    fn base_url_with_port_and_plain_http() {
        let p = Profile {
            port: Some(Port::Text("8080".into())),
            ssl_enabled: Some(false),
            ..profile()
        };
        assert_eq!(p.base_url().unwrap().as_str(), "http://algosec.example.com:8080/");

        let numeric = Profile {
            port: Some(Port::Number(8443)),
            ..profile()
        };
        assert_eq!(numeric.base_url().unwrap().port(), Some(8443));
    }

    #[test]
    fn missing_host() {
        let p = Profile {
            host: None,
            ..profile()
        };
        assert_eq!(message(p.validate().unwrap_err()), MISSING_HOST);
    }

    #[test]
    fn non_numeric_port() {
        for port in ["80a", "", "-1", "99999"] {
            let p = Profile {
                port: Some(Port::Text(port.into())),
                ..profile()
            };
            assert_eq!(message(p.validate().unwrap_err()), BAD_PORT, "port {port:?}");
        }
    }

    #[test]
    fn missing_user() {
        let p = Profile {
            user: None,
            ..profile()
        };
        assert_eq!(message(p.validate().unwrap_err()), MISSING_CREDENTIALS);
    }

    #[test]
    fn credentials_file_round_trip() {
        let p = Profile::from_credentials_json(
            r#"{
                "host": "10.0.0.5",
                "port": "443",
                "user": "admin",
                "password": "pw",
                "ssl_enabled": true,
                "managed_applications": ["app1", "app2"]
            }"#,
        )
        .unwrap();

        assert_eq!(p.base_url().unwrap().as_str(), "https://10.0.0.5/");
        assert!(p.managed().is_managed("app2"));
        assert!(!p.managed().is_managed("app3"));
    }

    #[test]
    fn credentials_file_messages() {
        let cases = [
            (r#"{"user": "u", "password": "p"}"#, MISSING_HOST),
            (r#"{"host": "h", "port": "x1", "user": "u", "password": "p"}"#, BAD_PORT),
            (r#"{"host": "h", "user": "u"}"#, MISSING_CREDENTIALS),
            (r#"{"host": "h", "password": "p"}"#, MISSING_CREDENTIALS),
            (
                r#"{"host": "h", "user": "u", "password": "p", "ssl_enabled": "yes"}"#,
                BAD_SSL_ENABLED,
            ),
            (
                r#"{"host": "h", "user": "u", "password": "p", "managed_applications": ["a", 1]}"#,
                BAD_MANAGED_APPLICATIONS,
            ),
        ];
        for (raw, expected) in cases {
            let err = Profile::from_credentials_json(raw).unwrap_err();
            assert_eq!(message(err), expected, "input: {raw}");
        }
    }

    #[test]
    fn device_config_from_profile() {
        let p = Profile {
            managed_applications: Some(vec!["payroll".into()]),
            insecure: Some(true),
            timeout: Some(5),
            ..profile()
        };
        let cfg = device_config(&p, SecretString::from("pw".to_string())).unwrap();

        assert_eq!(cfg.username, "admin");
        assert_eq!(cfg.password.expose_secret(), "pw");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(cfg.managed.is_managed("payroll"));
        assert!(!cfg.managed.is_managed("billing"));
    }

    #[test]
    fn empty_managed_list_manages_all() {
        let p = Profile {
            managed_applications: Some(vec![]),
            ..profile()
        };
        assert!(p.managed().is_managed("anything"));
    }

    #[test]
    fn load_toml_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "prod"

[profiles.prod]
host = "algosec.example.com"
port = 8443
user = "admin"
managed_applications = ["payroll"]
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
        let prod = cfg.profile("prod").unwrap();
        assert_eq!(prod.port, Some(Port::Number(8443)));
        assert_eq!(cfg.defaults.timeout, 30);

        match cfg.profile("staging").unwrap_err() {
            ConfigError::ProfileNotFound { available, .. } => {
                assert_eq!(available, vec!["prod".to_owned()]);
            }
            other => panic!("expected ProfileNotFound, got: {other:?}"),
        }
    }
}
