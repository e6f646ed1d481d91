//! Application command handlers.

use tabled::Tabled;

use abflow_core::{Application, ApplicationProvider, Context, Provider, ResourceKind};

use crate::cli::{ApplicationsArgs, ApplicationsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: ApplicationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctx = ctx.scoped(ResourceKind::Application);
    let provider = ApplicationProvider;

    match args.command {
        ApplicationsCommand::List => {
            let apps = provider.get(&ctx).await?;
            let out = output::render_list(
                &global.output,
                &apps,
                |a| ApplicationRow::from(a),
                |a| a.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApplicationsCommand::Create { name } => {
            provider
                .create(&ctx, &name, &Application::present(name.as_str()))
                .await?;
            util::status(&format!("Application '{name}' created"), global.quiet);
            Ok(())
        }

        ApplicationsCommand::Delete { name } => {
            if !util::confirm(
                &format!("Decommission application '{name}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            provider.delete(&ctx, &name).await?;
            util::status(&format!("Application '{name}' decommissioned"), global.quiet);
            Ok(())
        }
    }
}
