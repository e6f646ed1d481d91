use thiserror::Error;

/// Top-level error type for the `abflow-api` crate.
///
/// Covers every failure mode of the BusinessFlow REST surface:
/// authentication, transport, API-reported errors, and payload decoding.
/// `abflow-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session cookie was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── BusinessFlow API ────────────────────────────────────────────
    /// Non-success response from the BusinessFlow API.
    #[error("BusinessFlow API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// An application listing lacked the `revisionID` needed to address it.
    #[error("Application '{name}' has no revisionID")]
    MissingRevision { name: String },

    /// Lookup of a flow by name inside an application revision found nothing.
    #[error("Flow '{name}' not found in application revision {revision_id}")]
    FlowNotFound { revision_id: u64, name: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the session is gone
    /// and logging in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } | Self::FlowNotFound { .. } => true,
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
