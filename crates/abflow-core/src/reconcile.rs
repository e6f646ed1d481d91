// ── Reconcile runner ──
//
// Drives the providers through one pass: read observed state, diff it
// against the desired state, then issue each create/update/delete in
// order. Applications go first, flows second, drafts last. Every call is
// awaited before the next one starts; the first error aborts the pass and
// changes made before it stay applied.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use crate::context::Context;
use crate::error::CoreError;
use crate::manifest::DesiredState;
use crate::model::{
    APPLY_DRAFT_NAME, ApplyDraft, Change, ChangeAction, Ensure, Flow, FlowKey, ResourceKind,
};
use crate::provider::{ApplicationProvider, ApplyDraftProvider, FlowProvider, Provider};

/// Result of a reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Changes made, or planned when `noop` is set.
    pub changes: Vec<Change>,
    pub noop: bool,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Sequential reconcile runner over the three providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    noop: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan only: report what would change without mutating anything.
    #[must_use]
    pub fn noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    pub async fn run(
        &self,
        ctx: &Context,
        desired: &DesiredState,
    ) -> Result<ReconcileReport, CoreError> {
        self.reconcile_applications(&ctx.scoped(ResourceKind::Application), desired)
            .await?;
        self.reconcile_flows(&ctx.scoped(ResourceKind::Flow), desired)
            .await?;
        self.reconcile_drafts(&ctx.scoped(ResourceKind::ApplyDraft), desired)
            .await?;

        Ok(ReconcileReport {
            changes: ctx.changes(),
            noop: self.noop,
        })
    }

    // ── Applications ─────────────────────────────────────────────────

    async fn reconcile_applications(
        &self,
        ctx: &Context,
        desired: &DesiredState,
    ) -> Result<(), CoreError> {
        let provider = ApplicationProvider;
        let observed: HashSet<String> = provider
            .get(ctx)
            .await?
            .into_iter()
            .map(|app| app.name)
            .collect();

        for app in &desired.applications {
            let exists = observed.contains(&app.name);
            let action = match (app.ensure, exists) {
                (Ensure::Present, false) => ChangeAction::Create,
                (Ensure::Absent, true) => ChangeAction::Delete,
                _ => continue,
            };
            let change = Change::new(ResourceKind::Application, &app.name, action);
            match action {
                ChangeAction::Create => {
                    self.perform(ctx, change, &app.name, provider.create(ctx, &app.name, app))
                        .await?;
                }
                _ => {
                    self.perform(ctx, change, &app.name, provider.delete(ctx, &app.name))
                        .await?;
                }
            }
        }
        Ok(())
    }

    // ── Flows ────────────────────────────────────────────────────────

    async fn reconcile_flows(&self, ctx: &Context, desired: &DesiredState) -> Result<(), CoreError> {
        let provider = FlowProvider;
        let observed = provider.get(ctx).await?;
        let observed: HashMap<FlowKey, Flow> = provider
            .canonicalize(ctx, observed)
            .into_iter()
            .map(|flow| (flow.key(), flow))
            .collect();
        let wanted = provider.canonicalize(ctx, desired.flows.clone());

        for flow in &wanted {
            let key = flow.key();
            let action = match (flow.ensure, observed.get(&key)) {
                (Ensure::Present, None) => ChangeAction::Create,
                (Ensure::Present, Some(current)) if !current.same_attributes(flow) => {
                    ChangeAction::Update
                }
                (Ensure::Absent, Some(_)) => ChangeAction::Delete,
                _ => continue,
            };
            let change = Change::new(ResourceKind::Flow, key.to_string(), action);
            let application = key.application.as_str();
            match action {
                ChangeAction::Create => {
                    self.perform(ctx, change, application, provider.create(ctx, &key, flow))
                        .await?;
                }
                ChangeAction::Update => {
                    self.perform(ctx, change, application, provider.update(ctx, &key, flow))
                        .await?;
                }
                ChangeAction::Delete => {
                    self.perform(ctx, change, application, provider.delete(ctx, &key))
                        .await?;
                }
            }
        }
        Ok(())
    }

    // ── Drafts ───────────────────────────────────────────────────────

    async fn reconcile_drafts(
        &self,
        ctx: &Context,
        desired: &DesiredState,
    ) -> Result<(), CoreError> {
        let provider = ApplyDraftProvider;
        let wanted = ApplyDraft::new(desired.apply_drafts);
        let observed = provider.get(ctx).await?;
        if observed.iter().any(|current| *current == wanted) {
            return Ok(());
        }

        if self.noop {
            if wanted.apply {
                let change = Change::new(ResourceKind::ApplyDraft, APPLY_DRAFT_NAME, ChangeAction::Update);
                ctx.notice(format_args!("Would {change}"));
                ctx.record(change);
            }
            return Ok(());
        }
        provider.update(ctx, APPLY_DRAFT_NAME, &wanted).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Run `action` and record `change`, or only record it in noop mode.
    ///
    /// Noop mode still enforces the managed-application guard so a plan
    /// never hides a policy violation.
    async fn perform<F>(
        &self,
        ctx: &Context,
        change: Change,
        application: &str,
        action: F,
    ) -> Result<(), CoreError>
    where
        F: Future<Output = Result<(), CoreError>>,
    {
        if self.noop {
            ctx.device()
                .ensure_managed(operation_noun(change.action), application, change.name.clone())?;
            ctx.notice(format_args!("Would {change}"));
        } else {
            action.await?;
        }
        ctx.record(change);
        Ok(())
    }
}

fn operation_noun(action: ChangeAction) -> &'static str {
    match action {
        ChangeAction::Create => "Creation",
        ChangeAction::Update => "Update",
        ChangeAction::Delete => "Deletion",
    }
}
