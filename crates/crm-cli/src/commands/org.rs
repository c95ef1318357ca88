use crm_core::{CreateOrganization, UpdateOrganization};
use serde_json::Map;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OrgCommands;
use crate::cli::subcommands::org::{OrgCreateArgs, OrgUpdateArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `crm org <subcommand>`.
pub async fn handle(
    action: &OrgCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OrgCommands::Mine => output(&ctx.organizations.mine().await?, flags.format),
        OrgCommands::List => output(&ctx.organizations.list().await?, flags.format),
        OrgCommands::Create(args) => {
            let created = ctx.organizations.create(&create_request(args)).await?;
            output(&created, flags.format)
        }
        OrgCommands::Update(args) => {
            let update = update_request(args);
            if update.is_empty() {
                anyhow::bail!(
                    "org update: nothing to change (use --name, --industry, --plan or --setting)"
                );
            }
            let updated = ctx.organizations.update_mine(&update).await?;
            output(&updated, flags.format)
        }
    }
}

fn create_request(args: &OrgCreateArgs) -> CreateOrganization {
    CreateOrganization {
        name: args.name.trim().to_string(),
        industry_type: args.industry.clone(),
        subscription_plan: args.plan.clone(),
    }
}

fn update_request(args: &OrgUpdateArgs) -> UpdateOrganization {
    let settings = if args.settings.is_empty() {
        None
    } else {
        Some(args.settings.iter().cloned().collect::<Map<_, _>>())
    };
    UpdateOrganization {
        name: args.name.clone(),
        industry_type: args.industry.clone(),
        subscription_plan: args.plan.clone(),
        settings,
    }
}
