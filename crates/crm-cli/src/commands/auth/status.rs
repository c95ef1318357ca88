use chrono::Utc;
use crm_core::User;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    api_url: String,
    user: Option<String>,
    name: Option<String>,
    role: Option<String>,
    admin: Option<bool>,
    organization_id: Option<i64>,
    subject: Option<String>,
    expires_at: Option<String>,
    expired: Option<bool>,
    notice: Option<String>,
}

/// Local view only: no request is made, so an expired token still reads as
/// authenticated until the backend rejects it.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token = ctx.auth.credential();
    let user = ctx.session.user();
    let expiry = token
        .as_deref()
        .and_then(|t| crm_auth::token::decode_expiry(t).ok());

    let status = AuthStatusResponse {
        authenticated: token.is_some(),
        api_url: ctx.config.api.normalized_base_url().to_string(),
        user: user.as_ref().map(|u| u.email.clone()),
        name: user.as_ref().and_then(User::full_name),
        role: user.as_ref().map(|u| u.role.clone()),
        admin: user.as_ref().map(User::is_admin),
        organization_id: user.as_ref().and_then(|u| u.organization_id),
        subject: token
            .as_deref()
            .and_then(|t| crm_auth::token::decode_subject(t).ok()),
        expires_at: expiry.map(|at| at.to_rfc3339()),
        expired: expiry.map(|at| at <= Utc::now()),
        notice: ctx.flash.take_login_error(),
    };

    output(&status, flags.format)
}
