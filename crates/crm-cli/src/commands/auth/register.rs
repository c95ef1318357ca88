use crm_core::RegisterRequest;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthRegisterArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthRegisterResponse {
    registered: bool,
    user_id: Option<i64>,
    email: String,
    organization_id: Option<i64>,
}

pub async fn handle(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let request = RegisterRequest {
        email: args.email.trim().to_string(),
        password: args.password.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        organization_name: args.organization_name.clone(),
        organization_id: args.organization_id,
    };
    let response = ctx.auth.register(&request).await?;

    let user = response.user.as_ref();
    output(
        &AuthRegisterResponse {
            registered: true,
            user_id: user.map(|u| u.id),
            email: user.map_or(request.email.clone(), |u| u.email.clone()),
            organization_id: user.and_then(|u| u.organization_id),
        },
        flags.format,
    )
}
