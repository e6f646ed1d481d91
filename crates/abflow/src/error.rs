//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use abflow_config::ConfigError;
use abflow_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to BusinessFlow at {url}")]
    #[diagnostic(
        code(abflow::connection_failed),
        help(
            "Check that the appliance is reachable: {reason}\n\
             Self-signed certificate? Try --insecure or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(abflow::timeout),
        help("Increase timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(abflow::auth_failed),
        help("Verify the user and password of the active profile or credentials file.")
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(abflow::no_credentials),
        help(
            "Set ABFLOW_PASSWORD, store it in the system keyring under\n\
             service 'abflow', account '{profile}/password', or add it to the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Policy ───────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(abflow::unmanaged),
        help("Add the application to managed_applications to allow changes to it.")
    )]
    Unmanaged { message: String },

    #[error("'{operation}' is not supported")]
    #[diagnostic(code(abflow::not_implemented))]
    NotImplemented { operation: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(abflow::not_found),
        help("Run: abflow {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Failed to apply drafts for: {applications}")]
    #[diagnostic(
        code(abflow::draft_apply_failed),
        help("The other drafts were applied. Re-run `abflow drafts apply -v` for details.")
    )]
    DraftApplyFailed { applications: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(abflow::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(abflow::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(abflow::profile_not_found),
        help("Available profiles: {available}\nOr pass a device file with --credentials-file.")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(abflow::no_config),
        help(
            "Create a profile in {path}\n\
             or pass a device file with --credentials-file."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(abflow::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(abflow::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Internal error: {0}")]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Unmanaged { .. } | Self::NotImplemented { .. } => exit_code::PERMISSION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            err @ CoreError::Unmanaged { .. } => CliError::Unmanaged {
                message: err.to_string(),
            },

            CoreError::NotImplemented { operation } => CliError::NotImplemented { operation },

            CoreError::ApplicationNotFound { name } => CliError::NotFound {
                resource_type: "application".into(),
                identifier: name,
                list_command: "applications list".into(),
            },

            CoreError::FlowNotFound { name, .. } => CliError::NotFound {
                resource_type: "flow".into(),
                identifier: name,
                list_command: "flows list".into(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::DraftApplyFailed { applications } => CliError::DraftApplyFailed {
                applications: applications.join(", "),
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { message } => CliError::Validation {
                field: "device configuration".into(),
                reason: message,
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
