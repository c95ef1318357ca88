//! Dashboard overview and the profile endpoint it greets with.

use std::sync::Arc;

use crm_core::{DashboardOverview, DashboardPeriod, DashboardSummary, User};

use crate::client::ApiClient;
use crate::error::AuthError;
use crate::org::OrganizationService;
use crate::session::SessionStore;

const OVERVIEW_PATH: &str = "/dashboard/overview";
const PROFILE_PATH: &str = "/users/me";

#[derive(Debug, Clone)]
pub struct DashboardService {
    client: Arc<ApiClient>,
    session: SessionStore,
    organizations: OrganizationService,
}

impl DashboardService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, session: SessionStore) -> Self {
        let organizations = OrganizationService::new(Arc::clone(&client));
        Self {
            client,
            session,
            organizations,
        }
    }

    /// # Errors
    ///
    /// Propagates transport and HTTP failures.
    pub async fn overview(&self, period: DashboardPeriod) -> Result<DashboardOverview, AuthError> {
        self.client
            .get_with_query(OVERVIEW_PATH, &[("period", period.as_str())])
            .await
    }

    /// Fresh profile from the backend. The cached session record is left alone.
    ///
    /// # Errors
    ///
    /// Propagates transport and HTTP failures.
    pub async fn profile(&self) -> Result<User, AuthError> {
        self.client.get(PROFILE_PATH).await
    }

    /// Organization, overview and greeting for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a stored credential, and
    /// propagates failures from either request.
    pub async fn summary(&self, period: DashboardPeriod) -> Result<DashboardSummary, AuthError> {
        if !self.session.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }
        let organization = self.organizations.mine().await?;
        let overview = self.overview(period).await?;
        Ok(DashboardSummary::new(
            period,
            self.session.user(),
            organization,
            overview,
        ))
    }
}
