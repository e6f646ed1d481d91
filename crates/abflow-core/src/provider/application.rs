// ── Application provider ──
//
// Applications can only be created (by name) and decommissioned; the API
// has no call to change an existing application.

use crate::context::Context;
use crate::error::CoreError;
use crate::model::{Application, ResourceKind};

use super::Provider;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationProvider;

impl Provider for ApplicationProvider {
    type Resource = Application;
    type Identity = str;

    const KIND: ResourceKind = ResourceKind::Application;

    /// Every managed application on the appliance.
    async fn get(&self, ctx: &Context) -> Result<Vec<Application>, CoreError> {
        ctx.notice("Get all ABF Applications");
        let device = ctx.device();
        let apps = device.api().await?.get_applications().await?;
        Ok(apps
            .iter()
            .filter(|app| device.is_managed_application(&app.name))
            .map(Application::from)
            .collect())
    }

    async fn create(
        &self,
        ctx: &Context,
        name: &str,
        desired: &Application,
    ) -> Result<(), CoreError> {
        let device = ctx.device();
        device.ensure_managed("Creation", name, name)?;
        ctx.notice(format_args!("Creating '{name}' with {desired:?}"));

        device.api().await?.create_application(name).await?;
        Ok(())
    }

    async fn delete(&self, ctx: &Context, name: &str) -> Result<(), CoreError> {
        let device = ctx.device();
        device.ensure_managed("Deletion", name, name)?;
        ctx.notice(format_args!("Decommissioning '{name}'"));

        let revision_id = device.revision_id(name).await?;
        device
            .api()
            .await?
            .decommission_application(revision_id)
            .await?;
        Ok(())
    }
}
