// ── Runtime device configuration ──
//
// Describes how to reach a BusinessFlow appliance and which applications
// may be touched. Carries credentials but never reads disk: the CLI builds
// a `DeviceConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::guard::ManagedApplications;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed appliance certs).
    DangerAcceptInvalid,
}

/// Connection settings for a single BusinessFlow appliance.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Appliance root URL, e.g. `https://algosec.example.com`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub managed: ManagedApplications,
}

impl DeviceConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            managed: ManagedApplications::all(),
        }
    }

    #[must_use]
    pub fn with_managed(mut self, managed: ManagedApplications) -> Self {
        self.managed = managed;
        self
    }
}
