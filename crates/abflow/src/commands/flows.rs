//! Application flow command handlers.

use tabled::Tabled;

use abflow_core::manifest::FlowEntry;
use abflow_core::{Context, Flow, FlowName, FlowProvider, Manifest, Provider, ResourceKind};

use crate::cli::{FlowCreateArgs, FlowsArgs, FlowsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sources")]
    sources: String,
    #[tabled(rename = "Destinations")]
    destinations: String,
    #[tabled(rename = "Services")]
    services: String,
    #[tabled(rename = "Users")]
    users: String,
    #[tabled(rename = "Net Apps")]
    applications: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Flow> for FlowRow {
    fn from(f: &Flow) -> Self {
        Self {
            application: f.application.clone(),
            name: f.name.clone(),
            sources: f.sources.join(", "),
            destinations: f.destinations.join(", "),
            services: f.services.join(", "),
            users: f.users.join(", "),
            applications: f.applications.join(", "),
            comment: f.comment.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: FlowsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = ctx.scoped(ResourceKind::Flow);
    let provider = FlowProvider;

    match args.command {
        FlowsCommand::List { application } => {
            let mut flows = provider.get(&ctx).await?;
            if let Some(ref app) = application {
                flows.retain(|f| &f.application == app);
            }
            let out = output::render_list(
                &global.output,
                &flows,
                |f| FlowRow::from(f),
                |f| f.key().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FlowsCommand::Create(args) => {
            let flow = desired_flow(args)?;
            let key = flow.key();
            provider.create(&ctx, &key, &flow).await?;
            util::status(&format!("Flow '{key}' created"), global.quiet);
            Ok(())
        }

        FlowsCommand::Delete { title } => {
            let key = title.parse::<FlowName>()?.resolve(None)?;
            if !util::confirm(&format!("Delete flow '{key}'?"), global.yes)? {
                return Ok(());
            }
            provider.delete(&ctx, &key).await?;
            util::status(&format!("Flow '{key}' deleted"), global.quiet);
            Ok(())
        }
    }
}

/// Validate the flags the same way a manifest entry is validated.
fn desired_flow(args: FlowCreateArgs) -> Result<Flow, CliError> {
    let manifest = Manifest {
        flows: vec![FlowEntry {
            title: Some(args.title),
            sources: args.sources,
            destinations: args.destinations,
            services: args.services,
            users: args.users,
            applications: args.network_applications,
            comment: args.comment,
            ..FlowEntry::default()
        }],
        ..Manifest::default()
    };
    manifest
        .validate()?
        .flows
        .into_iter()
        .next()
        .ok_or_else(|| CliError::Internal("validated manifest lost its flow".into()))
}
