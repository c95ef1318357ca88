use clap::{Args, Subcommand};
use crm_core::DashboardPeriod;

use crate::cli::subcommands::{AuthCommands, OrgCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, register, sign out, inspect the session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Organizations.
    Org {
        #[command(subcommand)]
        action: OrgCommands,
    },
    /// Dashboard overview for your organization.
    Dashboard(DashboardArgs),
    /// Fetch your profile from the backend.
    Profile,
}

#[derive(Clone, Debug, Args)]
pub struct DashboardArgs {
    /// Reporting period: week, month, quarter, year.
    #[arg(long, default_value_t = DashboardPeriod::Month)]
    pub period: DashboardPeriod,
}
