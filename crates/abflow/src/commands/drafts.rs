//! Draft command handlers.

use serde::Serialize;
use tabled::Tabled;

use abflow_api::ApplicationRecord;
use abflow_core::{ApplyDraft, ApplyDraftProvider, Context, CoreError, ResourceKind};

use crate::cli::{DraftsArgs, DraftsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct DraftRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Revision")]
    revision: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&ApplicationRecord> for DraftRow {
    fn from(app: &ApplicationRecord) -> Self {
        Self {
            application: app.name.clone(),
            revision: app
                .revision_id
                .map_or_else(|| "─".into(), |id| id.to_string()),
            status: app.revision_status.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: DraftsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = ctx.scoped(ResourceKind::ApplyDraft);

    match args.command {
        DraftsCommand::Status => {
            let device = ctx.device();
            let apps = device
                .api()
                .await?
                .get_applications()
                .await
                .map_err(CoreError::from)?;
            let rows: Vec<DraftRow> = apps
                .iter()
                .filter(|app| device.is_managed_application(&app.name) && app.is_draft())
                .map(DraftRow::from)
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                DraftRow::clone,
                |r| r.application.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DraftsCommand::Apply => {
            ApplyDraftProvider.set(&ctx, &ApplyDraft::new(true)).await?;
            let changes = ctx.changes();
            if changes.is_empty() {
                util::status("No application drafts to apply", global.quiet);
                return Ok(());
            }
            let color = output::should_color(&global.color);
            let out = output::render_changes(&global.output, &changes, color)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
