use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crm_auth::{
    ApiClient, AuthService, DashboardService, FlashRedirect, FlashStore, Navigator,
    OrganizationService, SessionStore,
};
use crm_config::CrmConfig;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: CrmConfig,
    pub session: SessionStore,
    pub flash: FlashStore,
    pub auth: AuthService,
    pub organizations: OrganizationService,
    pub dashboard: DashboardService,
}

impl AppContext {
    /// Open the on-disk session stores and wire the HTTP client to them.
    ///
    /// A 401 from any endpoint clears the session and parks a notice in the
    /// flash store, which `crm auth status` and the next login report.
    pub fn init(config: CrmConfig) -> anyhow::Result<Self> {
        let session_dir = config.session.resolved_dir()?;
        let session = SessionStore::on_disk(&session_dir);
        let flash = FlashStore::on_disk(config.session.resolved_scoped_dir());
        let navigator: Arc<dyn Navigator> = Arc::new(FlashRedirect::new(flash.clone()));

        let client = ApiClient::with_session(
            config.api.normalized_base_url(),
            config.api.timeout_secs.map(Duration::from_secs),
            &session,
            Arc::clone(&navigator),
            &config.session.login_route,
        )
        .context("failed to build the API client")?;
        let client = Arc::new(client);

        let auth = AuthService::new(
            Arc::clone(&client),
            session.clone(),
            navigator,
            config.session.login_route.clone(),
        );
        let organizations = OrganizationService::new(Arc::clone(&client));
        let dashboard = DashboardService::new(client, session.clone());

        tracing::debug!(
            base_url = config.api.normalized_base_url(),
            session_dir = %session_dir.display(),
            "application context ready"
        );

        Ok(Self {
            config,
            session,
            flash,
            auth,
            organizations,
            dashboard,
        })
    }
}
