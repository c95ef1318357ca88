use crm_core::LoginCredentials;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    token_type: String,
    email: Option<String>,
    expires_at: Option<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let credentials = LoginCredentials::new(args.username.trim(), args.password.as_str());
    let response = ctx.auth.login(&credentials).await?;

    // The notice that sent the user here has been acted on.
    if let Err(error) = ctx.flash.clear_login_error() {
        tracing::warn!(%error, "failed to clear pending login notice");
    }

    output(
        &AuthLoginResponse {
            authenticated: true,
            token_type: response.token_type,
            email: response.user.map(|user| user.email),
            expires_at: crm_auth::token::decode_expiry(&response.access_token)
                .ok()
                .map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
