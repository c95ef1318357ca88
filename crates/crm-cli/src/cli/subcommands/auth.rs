use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Exchange email and password for a session.
    Login(AuthLoginArgs),
    /// Create an account (and optionally a new organization).
    Register(AuthRegisterArgs),
    /// Clear the stored session.
    Logout,
    /// Show current auth status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Account email.
    #[arg(long, short = 'u')]
    pub username: String,
    /// Account password.
    #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Create a new organization with this name.
    #[arg(long, conflicts_with = "organization_id")]
    pub organization_name: Option<String>,
    /// Join an existing organization.
    #[arg(long)]
    pub organization_id: Option<i64>,
}
