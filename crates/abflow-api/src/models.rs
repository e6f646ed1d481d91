// BusinessFlow API wire types
//
// Models for the JSON documents exchanged with `/BusinessFlow/rest/v1`.
// The API is inconsistent about field presence between releases, so most
// collections default to empty and undocumented fields land in `extra`.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// `flowType` tag carried by flows that belong to a single application.
/// Shared flows and other kinds use different tags.
pub const APPLICATION_FLOW_TYPE: &str = "APPLICATION_FLOW";

/// `revisionStatus` of an application revision that has not been applied yet.
pub const DRAFT_REVISION_STATUS: &str = "Draft";

// ── Application ──────────────────────────────────────────────────────

/// Application entry from `GET applications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub name: String,
    /// Identifier of the application's current revision. Some listings
    /// omit it; see [`ApplicationRecord::current_revision`].
    #[serde(default, rename = "revisionID")]
    pub revision_id: Option<u64>,
    /// `Active`, `Draft`, `Decommissioned`, ...
    #[serde(default, rename = "revisionStatus")]
    pub revision_status: Option<String>,
    #[serde(default, rename = "applicationId")]
    pub application_id: Option<u64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ApplicationRecord {
    /// Whether the current revision is an unapplied draft.
    pub fn is_draft(&self) -> bool {
        self.revision_status.as_deref() == Some(DRAFT_REVISION_STATUS)
    }

    /// The current revision id, or `Error::MissingRevision` when the API
    /// left it out.
    pub fn current_revision(&self) -> Result<u64, Error> {
        self.revision_id.ok_or_else(|| Error::MissingRevision {
            name: self.name.clone(),
        })
    }
}

/// Body of `POST applications/new`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewApplication<'a> {
    pub name: &'a str,
    pub custom_fields: Vec<serde_json::Value>,
    pub contacts: Vec<serde_json::Value>,
    pub labels: Vec<serde_json::Value>,
    pub flows: Vec<serde_json::Value>,
}

// ── Flow ─────────────────────────────────────────────────────────────

/// `{ "name": ... }` reference used for endpoints and services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedObject {
    pub name: String,
}

impl NamedObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Entry of a flow's `networkUsers`. `id == 0` is the "Any" placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkUserRef {
    pub id: i64,
    pub name: String,
}

/// Entry of a flow's `networkApplications`. `revisionID == 0` is the "Any" placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkApplicationRef {
    #[serde(rename = "revisionID")]
    pub revision_id: u64,
    pub name: String,
}

/// Flow entry from `GET applications/{revision}/flows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(rename = "flowID")]
    pub flow_id: u64,
    pub name: String,
    #[serde(default, rename = "flowType")]
    pub flow_type: String,
    #[serde(default)]
    pub sources: Vec<NamedObject>,
    #[serde(default)]
    pub destinations: Vec<NamedObject>,
    #[serde(default)]
    pub services: Vec<NamedObject>,
    /// Absent when the flow was never scoped to users.
    #[serde(default, rename = "networkUsers")]
    pub network_users: Option<Vec<NetworkUserRef>>,
    /// Absent when the flow was never scoped to network applications.
    #[serde(default, rename = "networkApplications")]
    pub network_applications: Option<Vec<NetworkApplicationRef>>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlowRecord {
    pub fn is_application_flow(&self) -> bool {
        self.flow_type == APPLICATION_FLOW_TYPE
    }
}

/// Desired attributes of a flow, as sent to `POST applications/{revision}/flows/new`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFlow {
    pub name: String,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub services: Vec<String>,
    pub users: Vec<String>,
    pub applications: Vec<String>,
    pub comment: String,
}

/// Wire shape of a [`NewFlow`].
#[derive(Debug, Serialize)]
pub(crate) struct NewFlowBody<'a> {
    #[serde(rename = "type")]
    pub flow_type: &'static str,
    pub name: &'a str,
    pub sources: Vec<NamedObject>,
    pub destinations: Vec<NamedObject>,
    pub services: Vec<NamedObject>,
    pub users: &'a [String],
    pub network_applications: Vec<NamedObject>,
    pub comment: &'a str,
    pub custom_fields: Vec<serde_json::Value>,
}

impl<'a> From<&'a NewFlow> for NewFlowBody<'a> {
    fn from(flow: &'a NewFlow) -> Self {
        let named = |items: &[String]| -> Vec<NamedObject> {
            items.iter().map(NamedObject::new).collect()
        };
        Self {
            flow_type: "APPLICATION",
            name: &flow.name,
            sources: named(&flow.sources),
            destinations: named(&flow.destinations),
            services: named(&flow.services),
            users: &flow.users,
            network_applications: named(&flow.applications),
            comment: &flow.comment,
            custom_fields: Vec::new(),
        }
    }
}

/// Error document returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
