use crm_core::{DashboardOverview, DashboardSummary};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DashboardArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DashboardView {
    greeting: String,
    organization: String,
    plan: String,
    period: String,
    #[serde(flatten)]
    overview: DashboardOverview,
}

impl From<DashboardSummary> for DashboardView {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            greeting: format!("Welcome, {}", summary.greeting_name),
            organization: summary.organization.name,
            plan: summary.organization.subscription_plan,
            period: summary.period.to_string(),
            overview: summary.overview,
        }
    }
}

pub async fn handle(
    args: &DashboardArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let summary = ctx.dashboard.summary(args.period).await?;
    output(&DashboardView::from(summary), flags.format)
}
