// ── API-to-domain type conversions ──
//
// Bridges raw `abflow_api` records into canonical `abflow_core::model`
// types. The BusinessFlow API reports "Any" users and network applications
// as sentinel entries with id 0; those normalize to empty lists, exactly
// like an absent field.

use abflow_api::models::{
    ApplicationRecord, FlowRecord, NamedObject, NetworkApplicationRef, NetworkUserRef, NewFlow,
};

use crate::model::{Application, Ensure, Flow};

// ── Helpers ────────────────────────────────────────────────────────

fn names(objects: &[NamedObject]) -> Vec<String> {
    objects.iter().map(|o| o.name.clone()).collect()
}

/// Users of a flow, minus the "Any" placeholder (`id == 0`).
fn flow_users(users: Option<&[NetworkUserRef]>) -> Vec<String> {
    users
        .unwrap_or_default()
        .iter()
        .filter(|u| u.id != 0)
        .map(|u| u.name.clone())
        .collect()
}

/// Network applications of a flow, minus the "Any" placeholder (`revisionID == 0`).
fn flow_applications(applications: Option<&[NetworkApplicationRef]>) -> Vec<String> {
    applications
        .unwrap_or_default()
        .iter()
        .filter(|a| a.revision_id != 0)
        .map(|a| a.name.clone())
        .collect()
}

// ── Application ────────────────────────────────────────────────────

impl From<&ApplicationRecord> for Application {
    fn from(record: &ApplicationRecord) -> Self {
        Application::present(&record.name)
    }
}

// ── Flow ───────────────────────────────────────────────────────────

/// Convert a raw flow of `application` into its domain form.
///
/// Returns `None` for flows that are not application flows (shared flows
/// and the like are not managed here). The result keeps the API's list
/// order; see [`canonicalize`].
pub fn normalize_flow(application: &str, record: &FlowRecord) -> Option<Flow> {
    if !record.is_application_flow() {
        return None;
    }

    Some(Flow {
        name: record.name.clone(),
        application: application.to_owned(),
        sources: names(&record.sources),
        destinations: names(&record.destinations),
        services: names(&record.services),
        users: flow_users(record.network_users.as_deref()),
        applications: flow_applications(record.network_applications.as_deref()),
        comment: record.comment.clone().unwrap_or_default(),
        ensure: Ensure::Present,
    })
}

/// Canonicalize a batch of flows for comparison.
pub fn canonicalize(flows: Vec<Flow>) -> Vec<Flow> {
    flows.into_iter().map(Flow::canonical).collect()
}

impl From<&Flow> for NewFlow {
    fn from(flow: &Flow) -> Self {
        NewFlow {
            name: flow.name.clone(),
            sources: flow.sources.clone(),
            destinations: flow.destinations.clone(),
            services: flow.services.clone(),
            users: flow.users.clone(),
            applications: flow.applications.clone(),
            comment: flow.comment.clone(),
        }
    }
}
