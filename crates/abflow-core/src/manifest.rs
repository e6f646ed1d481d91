// ── Desired-state manifest ──
//
// YAML or JSON document listing the applications and flows that should
// (or should not) exist, plus whether outstanding drafts get applied.
// `Manifest::validate` is the schema layer: providers only ever see
// records that passed it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Application, Ensure, Flow, FlowName};

/// Shortest accepted application name.
const MIN_APPLICATION_NAME_LEN: usize = 2;

/// Raw manifest as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub applications: Vec<ApplicationEntry>,
    #[serde(default)]
    pub flows: Vec<FlowEntry>,
    #[serde(default)]
    pub apply_drafts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationEntry {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
}

/// A flow entry, identified either by `title` (`"app/name"` or `"name"`)
/// or by the `name` and `application` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default)]
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

/// A validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub applications: Vec<Application>,
    pub flows: Vec<Flow>,
    pub apply_drafts: bool,
}

impl Manifest {
    /// Read a manifest file. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            message: format!("cannot read manifest {}: {e}", path.display()),
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_yaml(&raw)
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, CoreError> {
        serde_yaml::from_str(raw)
            .map_err(|e| CoreError::validation(format!("invalid manifest: {e}")))
    }

    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::validation(format!("invalid manifest: {e}")))
    }

    /// Check every entry and resolve flow identities.
    pub fn validate(self) -> Result<DesiredState, CoreError> {
        let mut seen_apps = HashSet::new();
        let mut applications = Vec::with_capacity(self.applications.len());
        for entry in self.applications {
            validate_application_name(&entry.name)?;
            if !seen_apps.insert(entry.name.clone()) {
                return Err(CoreError::validation(format!(
                    "application '{}' is declared more than once",
                    entry.name
                )));
            }
            applications.push(Application {
                name: entry.name,
                ensure: entry.ensure,
            });
        }

        let mut seen_flows = HashSet::new();
        let mut flows = Vec::with_capacity(self.flows.len());
        for entry in self.flows {
            let flow = entry.into_flow()?;
            if !seen_flows.insert(flow.key()) {
                return Err(CoreError::validation(format!(
                    "flow '{}' is declared more than once",
                    flow.key()
                )));
            }
            flows.push(flow);
        }

        Ok(DesiredState {
            applications,
            flows,
            apply_drafts: self.apply_drafts,
        })
    }
}

impl FlowEntry {
    fn into_flow(self) -> Result<Flow, CoreError> {
        let flow_name = match (self.title, self.name) {
            (Some(title), None) => title.parse::<FlowName>()?,
            (None, Some(name)) if !name.is_empty() => FlowName {
                application: None,
                name,
            },
            (Some(_), Some(_)) => {
                return Err(CoreError::validation(
                    "flow entry sets both 'title' and 'name'",
                ));
            }
            (None, _) => {
                return Err(CoreError::validation("flow entry needs a 'title' or 'name'"));
            }
        };
        let key = flow_name.resolve(self.application.as_deref())?;

        if self.ensure == Ensure::Present {
            require_list(&key.to_string(), "sources", &self.sources)?;
            require_list(&key.to_string(), "destinations", &self.destinations)?;
            require_list(&key.to_string(), "services", &self.services)?;
            for service in &self.services {
                validate_service(&key.to_string(), service)?;
            }
        }
        check_entries(&key.to_string(), "users", &self.users)?;
        check_entries(&key.to_string(), "applications", &self.applications)?;

        Ok(Flow {
            name: key.name,
            application: key.application,
            sources: self.sources,
            destinations: self.destinations,
            services: self.services,
            users: self.users,
            applications: self.applications,
            comment: self.comment,
            ensure: self.ensure,
        })
    }
}

// ── Field rules ──────────────────────────────────────────────────────

fn validate_application_name(name: &str) -> Result<(), CoreError> {
    if name.chars().count() < MIN_APPLICATION_NAME_LEN {
        return Err(CoreError::validation(format!(
            "application name '{name}' must be at least {MIN_APPLICATION_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn require_list(flow: &str, field: &str, values: &[String]) -> Result<(), CoreError> {
    if values.is_empty() {
        return Err(CoreError::validation(format!(
            "flow '{flow}': '{field}' needs at least one entry"
        )));
    }
    check_entries(flow, field, values)
}

fn check_entries(flow: &str, field: &str, values: &[String]) -> Result<(), CoreError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(CoreError::validation(format!(
            "flow '{flow}': '{field}' contains an empty entry"
        )));
    }
    Ok(())
}

/// Services are either a named BusinessFlow service or `tcp/<port>` / `udp/<port>`.
fn validate_service(flow: &str, service: &str) -> Result<(), CoreError> {
    let Some((proto, port)) = service.split_once('/') else {
        return Ok(());
    };
    let proto_ok = proto.eq_ignore_ascii_case("tcp") || proto.eq_ignore_ascii_case("udp");
    let port_ok = port.parse::<u16>().is_ok_and(|p| p > 0);
    if proto_ok && port_ok {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "flow '{flow}': service '{service}' must be a named service or tcp/<port> or udp/<port>"
        )))
    }
}
