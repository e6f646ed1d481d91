// ── Draft-apply provider ──
//
// The singleton `apply` resource. Reading it reports whether drafts are
// outstanding; setting it to `true` commits them. Must run after every
// application and flow change of the pass, since applying a draft commits
// whatever those changes staged.

use crate::context::Context;
use crate::error::CoreError;
use crate::model::{ApplyDraft, DraftAction, ResourceKind};

use super::Provider;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyDraftProvider;

impl ApplyDraftProvider {
    /// Converge the draft state toward `desired`.
    pub async fn set(&self, ctx: &Context, desired: &ApplyDraft) -> Result<(), CoreError> {
        let device = ctx.device();
        match device.draft_state().await?.action(desired.apply) {
            DraftAction::Apply => {
                ctx.updating(&desired.name, async {
                    let report = device.apply_application_drafts().await?;
                    if report.is_success() {
                        Ok(())
                    } else {
                        Err(CoreError::DraftApplyFailed {
                            applications: report.failed.into_iter().map(|(name, _)| name).collect(),
                        })
                    }
                })
                .await
            }
            DraftAction::Skip => {
                ctx.info("application drafts detected, but skipping apply as requested");
                Ok(())
            }
            DraftAction::Nothing => {
                ctx.debug("no application drafts detected");
                Ok(())
            }
        }
    }
}

impl Provider for ApplyDraftProvider {
    type Resource = ApplyDraft;
    type Identity = str;

    const KIND: ResourceKind = ResourceKind::ApplyDraft;

    async fn get(&self, ctx: &Context) -> Result<Vec<ApplyDraft>, CoreError> {
        let state = ctx.device().draft_state().await?;
        Ok(vec![state.observed()])
    }

    async fn create(&self, ctx: &Context, _name: &str, desired: &ApplyDraft) -> Result<(), CoreError> {
        self.set(ctx, desired).await
    }

    async fn update(&self, ctx: &Context, _name: &str, desired: &ApplyDraft) -> Result<(), CoreError> {
        self.set(ctx, desired).await
    }
}
