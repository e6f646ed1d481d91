// ── Application domain type ──

use serde::{Deserialize, Serialize};

use super::common::Ensure;

/// A BusinessFlow application. Only its name is managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
}

impl Application {
    /// Observed application; anything returned by the appliance exists.
    pub fn present(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ensure: Ensure::Present,
        }
    }
}
