// ── Managed-application allow-list ──

use serde::{Deserialize, Serialize};

/// The set of applications this tool may alter.
///
/// An empty list means every application is managed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagedApplications(Vec<String>);

impl ManagedApplications {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Allow-list that manages every application.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_managed(&self, name: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|managed| managed == name)
    }

    /// Whether the allow-list is unrestricted.
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ManagedApplications {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}
