// BusinessFlow application flow endpoints
//
// Flows are scoped to an application revision. There is no update call:
// changing a flow means deleting it and creating it again.

use serde_json::Value;
use tracing::{debug, trace};

use crate::client::AbfClient;
use crate::error::Error;
use crate::models::{APPLICATION_FLOW_TYPE, FlowRecord, NewFlow, NewFlowBody};

/// Keep the entries tagged `APPLICATION_FLOW` and decode only those.
///
/// Shared flows and other kinds come back in the same list with a different
/// shape (often without `flowID`), so they are dropped before typed decoding.
fn application_flows(raw: Vec<Value>) -> Result<Vec<FlowRecord>, Error> {
    raw.into_iter()
        .filter(|entry| {
            entry.get("flowType").and_then(Value::as_str) == Some(APPLICATION_FLOW_TYPE)
        })
        .map(|entry| {
            serde_json::from_value(entry.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: entry.to_string(),
            })
        })
        .collect()
}

impl AbfClient {
    /// List the application flows of an application revision.
    ///
    /// `GET /BusinessFlow/rest/v1/applications/{revision_id}/flows`
    ///
    /// Entries of any other `flowType` are skipped.
    pub async fn get_application_flows(&self, revision_id: u64) -> Result<Vec<FlowRecord>, Error> {
        let revision = revision_id.to_string();
        let url = self.api_url(&["applications", &revision, "flows"])?;
        debug!(revision_id, "listing application flows");
        let raw: Vec<Value> = self.get(url).await?;
        let total = raw.len();
        let flows = application_flows(raw)?;
        trace!(revision_id, total, kept = flows.len(), "filtered flow kinds");
        Ok(flows)
    }

    /// Find a flow of an application revision by name.
    ///
    /// The API has no lookup-by-name endpoint, so this scans the flow list.
    pub async fn get_application_flow_by_name(
        &self,
        revision_id: u64,
        name: &str,
    ) -> Result<FlowRecord, Error> {
        self.get_application_flows(revision_id)
            .await?
            .into_iter()
            .find(|flow| flow.name == name)
            .ok_or_else(|| Error::FlowNotFound {
                revision_id,
                name: name.to_owned(),
            })
    }

    /// Create a flow in an application revision and return the stored record.
    ///
    /// `POST /BusinessFlow/rest/v1/applications/{revision_id}/flows/new`
    ///
    /// The endpoint takes a batch; this always sends a single flow and picks
    /// it out of the response by name.
    pub async fn create_application_flow(
        &self,
        revision_id: u64,
        flow: &NewFlow,
    ) -> Result<FlowRecord, Error> {
        let revision = revision_id.to_string();
        let url = self.api_url(&["applications", &revision, "flows", "new"])?;
        debug!(revision_id, flow = %flow.name, "creating application flow");

        let created: Vec<Value> = self.post(url, &[NewFlowBody::from(flow)]).await?;
        application_flows(created)?
            .into_iter()
            .find(|record| record.name == flow.name)
            .ok_or_else(|| Error::FlowNotFound {
                revision_id,
                name: flow.name.clone(),
            })
    }

    /// Delete a flow by its numeric id.
    ///
    /// `DELETE /BusinessFlow/rest/v1/applications/{revision_id}/flows/{flow_id}`
    pub async fn delete_flow_by_id(&self, revision_id: u64, flow_id: u64) -> Result<(), Error> {
        let revision = revision_id.to_string();
        let flow = flow_id.to_string();
        let url = self.api_url(&["applications", &revision, "flows", &flow])?;
        debug!(revision_id, flow_id, "deleting application flow");
        self.delete(url).await
    }
}
