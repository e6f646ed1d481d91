//! `apply`: reconcile the device against a manifest.

use abflow_core::{Context, Manifest, Reconciler};

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(ctx: &Context, args: ApplyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let desired = Manifest::from_path(&args.file)?.validate()?;
    tracing::debug!(
        applications = desired.applications.len(),
        flows = desired.flows.len(),
        apply_drafts = desired.apply_drafts,
        "manifest loaded"
    );

    let report = Reconciler::new().noop(args.noop).run(ctx, &desired).await?;
    if report.is_empty() {
        util::status("No changes", global.quiet);
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let out = output::render_changes(&global.output, &report.changes, color)?;
    output::print_output(&out, global.quiet);

    let verb = if report.noop { "planned" } else { "applied" };
    util::status(
        &format!("{} change(s) {verb}", report.changes.len()),
        global.quiet,
    );
    Ok(())
}
