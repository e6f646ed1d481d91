// ── Application flow domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::common::Ensure;
use crate::error::CoreError;

/// A traffic pattern (sources → destinations over services) scoped to an
/// application. Identity is the `(application, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    pub application: String,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub services: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub ensure: Ensure,
}

impl Flow {
    pub fn key(&self) -> FlowKey {
        FlowKey::new(&self.application, &self.name)
    }

    /// Canonical form: the five list attributes sorted ascending.
    ///
    /// Idempotent; every other field is left untouched.
    #[must_use]
    pub fn canonical(mut self) -> Self {
        for list in [
            &mut self.sources,
            &mut self.destinations,
            &mut self.services,
            &mut self.users,
            &mut self.applications,
        ] {
            list.sort_unstable();
        }
        self
    }

    /// Whether two flows carry the same managed attributes.
    ///
    /// Both sides are expected in canonical form.
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.sources == other.sources
            && self.destinations == other.destinations
            && self.services == other.services
            && self.users == other.users
            && self.applications == other.applications
            && self.comment == other.comment
    }
}

// ── Identity ─────────────────────────────────────────────────────────

/// Fully resolved flow identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    pub application: String,
    pub name: String,
}

impl FlowKey {
    pub fn new(application: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.application, self.name)
    }
}

/// A flow title as written by a user: `"<application>/<name>"` or `"<name>"`.
///
/// The first `/` separates the application from the flow name, so an
/// application name can never contain `/` while a flow name may
/// (`"app/10.0.0.0/8 web"` is flow `10.0.0.0/8 web` of `app`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowName {
    pub application: Option<String>,
    pub name: String,
}

impl FlowName {
    /// Resolve to a full identity, taking the application from `fallback`
    /// when the title did not carry one.
    ///
    /// A title's own application wins over the fallback only when they agree.
    pub fn resolve(self, fallback: Option<&str>) -> Result<FlowKey, CoreError> {
        let application = match (self.application, fallback) {
            (Some(own), Some(other)) if own != other => {
                return Err(CoreError::validation(format!(
                    "flow '{own}/{}' conflicts with application '{other}'",
                    self.name
                )));
            }
            (Some(own), _) => own,
            (None, Some(other)) if !other.is_empty() => other.to_owned(),
            (None, _) => {
                return Err(CoreError::validation(format!(
                    "flow '{}' has no application",
                    self.name
                )));
            }
        };
        Ok(FlowKey::new(application, self.name))
    }
}

impl FromStr for FlowName {
    type Err = CoreError;

    fn from_str(title: &str) -> Result<Self, Self::Err> {
        let (application, name) = match title.split_once('/') {
            Some((application, name)) => (Some(application), name),
            None => (None, title),
        };

        if name.is_empty() || application.is_some_and(str::is_empty) {
            return Err(CoreError::validation(format!(
                "invalid flow title '{title}': expected '<application>/<name>' or '<name>'"
            )));
        }

        Ok(Self {
            application: application.map(str::to_owned),
            name: name.to_owned(),
        })
    }
}
