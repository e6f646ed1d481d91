//! CLI configuration: thin wrapper around `abflow_config`.
//!
//! Adds device resolution that respects `GlobalOpts` (`--profile`,
//! `--credentials-file`, `--insecure`, `--timeout`).

use secrecy::SecretString;

use abflow_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use abflow_config::{Config, Profile, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `DeviceConfig` for this invocation.
///
/// A `--credentials-file` wins over profiles and carries its own password.
/// Otherwise the active profile is used and its password resolved through
/// env, keyring, then plaintext.
pub fn resolve_device(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    if let Some(ref path) = global.credentials_file {
        let profile = with_overrides(abflow_config::load_credentials_file(path)?, global);
        let password = SecretString::from(profile.password.clone().unwrap_or_default());
        return Ok(abflow_config::device_config(&profile, password)?);
    }

    let cfg = abflow_config::load_config()?;
    if cfg.profiles.is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    let profile_name = active_profile_name(global, &cfg);
    let profile = with_overrides(cfg.profile(&profile_name)?.clone(), global);
    Ok(abflow_config::profile_to_device_config(&profile, &profile_name)?)
}

/// Apply flag overrides on top of a profile.
fn with_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}
