// ── Core error types ──
//
// User-facing errors from abflow-core. Consumers never see raw HTTP or
// JSON failures: the `From<abflow_api::Error>` impl translates them into
// domain variants. Policy errors are raised before any remote call.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to BusinessFlow at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("BusinessFlow request timed out")]
    Timeout,

    // ── Policy errors ────────────────────────────────────────────────
    /// Mutation of an application outside the managed allow-list.
    #[error("{operation} cancelled for unmanaged application {target}")]
    Unmanaged { operation: String, target: String },

    #[error("Operation not implemented: {operation}")]
    NotImplemented { operation: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Application not found: {name}")]
    ApplicationNotFound { name: String },

    #[error("Flow '{name}' not found in application revision {revision_id}")]
    FlowNotFound { revision_id: u64, name: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Failed to apply drafts for: {}", applications.join(", "))]
    DraftApplyFailed { applications: Vec<String> },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Policy error for a mutation of an unmanaged application.
    ///
    /// `operation` is the capitalized noun ("Creation", "Update",
    /// "Deletion"); `target` is the application or `application/flow`.
    pub fn unmanaged(operation: &str, target: impl Into<String>) -> Self {
        Self::Unmanaged {
            operation: operation.to_owned(),
            target: target.into(),
        }
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<abflow_api::Error> for CoreError {
    fn from(err: abflow_api::Error) -> Self {
        match err {
            abflow_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            abflow_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: err.status(),
                    }
                }
            }
            abflow_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            abflow_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            abflow_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            abflow_api::Error::MissingRevision { name } => CoreError::Api {
                message: format!("Application '{name}' was listed without a revisionID"),
                status: None,
            },
            abflow_api::Error::FlowNotFound { revision_id, name } => {
                CoreError::FlowNotFound { revision_id, name }
            }
            abflow_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
