// ── Application flow provider ──
//
// Flows live inside an application revision, so every mutation first
// resolves the application's current revision id by name. The API has no
// update call: `update` deletes the flow and creates it again. The two
// steps are not atomic; if the create fails the flow stays deleted.

use abflow_api::NewFlow;

use crate::context::Context;
use crate::convert;
use crate::error::CoreError;
use crate::model::{Flow, FlowKey, ResourceKind};

use super::Provider;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowProvider;

impl Provider for FlowProvider {
    type Resource = Flow;
    type Identity = FlowKey;

    const KIND: ResourceKind = ResourceKind::Flow;

    /// Application flows of every managed application, in application order.
    async fn get(&self, ctx: &Context) -> Result<Vec<Flow>, CoreError> {
        ctx.notice("Getting all application flows");
        let device = ctx.device();
        let api = device.api().await?;

        let mut flows = Vec::new();
        for app in api.get_applications().await? {
            if !device.is_managed_application(&app.name) {
                continue;
            }
            let records = api.get_application_flows(app.current_revision()?).await?;
            flows.extend(
                records
                    .iter()
                    .filter_map(|record| convert::normalize_flow(&app.name, record)),
            );
        }
        Ok(flows)
    }

    async fn create(&self, ctx: &Context, key: &FlowKey, desired: &Flow) -> Result<(), CoreError> {
        let device = ctx.device();
        device.ensure_managed("Creation", &key.application, key.to_string())?;
        ctx.notice(format_args!(
            "Creating application flow '{key}' with {desired:?}"
        ));

        let revision_id = device.revision_id(&key.application).await?;
        let flow = NewFlow {
            name: key.name.clone(),
            ..NewFlow::from(desired)
        };
        device
            .api()
            .await?
            .create_application_flow(revision_id, &flow)
            .await?;
        Ok(())
    }

    async fn update(&self, ctx: &Context, key: &FlowKey, desired: &Flow) -> Result<(), CoreError> {
        ctx.device()
            .ensure_managed("Update", &key.application, key.to_string())?;
        ctx.notice(format_args!("Updating application flow '{key}'"));

        self.delete(ctx, key).await?;
        self.create(ctx, key, desired).await.inspect_err(|e| {
            ctx.warning(format_args!(
                "Application flow '{key}' was deleted but could not be recreated: {e}"
            ));
        })
    }

    async fn delete(&self, ctx: &Context, key: &FlowKey) -> Result<(), CoreError> {
        let device = ctx.device();
        device.ensure_managed("Deletion", &key.application, key.to_string())?;
        ctx.notice(format_args!("Deleting application flow '{key}'"));

        let revision_id = device.revision_id(&key.application).await?;
        let api = device.api().await?;
        let flow = api
            .get_application_flow_by_name(revision_id, &key.name)
            .await?;
        api.delete_flow_by_id(revision_id, flow.flow_id).await?;
        Ok(())
    }

    fn canonicalize(&self, _ctx: &Context, records: Vec<Flow>) -> Vec<Flow> {
        convert::canonicalize(records)
    }
}
