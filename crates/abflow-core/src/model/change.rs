// ── Change records ──

use std::fmt;

use serde::Serialize;
use strum::Display;

use super::common::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

/// One mutation planned or performed during a reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub kind: ResourceKind,
    pub name: String,
    pub action: ChangeAction,
}

impl Change {
    pub fn new(kind: ResourceKind, name: impl Into<String>, action: ChangeAction) -> Self {
        Self {
            kind,
            name: name.into(),
            action,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}]", self.action, self.kind, self.name)
    }
}
