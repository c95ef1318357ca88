//! Organization endpoints.
//!
//! `list` is admin-only on the backend; everyone else works with their own
//! organization through the `my-organization` routes.

use std::sync::Arc;

use crm_core::{CreateOrganization, Organization, UpdateOrganization};

use crate::client::ApiClient;
use crate::error::AuthError;

const ORGANIZATIONS_PATH: &str = "/organizations";
const MY_ORGANIZATION_PATH: &str = "/organizations/my-organization";

#[derive(Debug, Clone)]
pub struct OrganizationService {
    client: Arc<ApiClient>,
}

impl OrganizationService {
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Propagates transport and HTTP failures (403 for non-admins).
    pub async fn list(&self) -> Result<Vec<Organization>, AuthError> {
        self.client.get(ORGANIZATIONS_PATH).await
    }

    /// The caller's own organization.
    ///
    /// # Errors
    ///
    /// Propagates transport and HTTP failures.
    pub async fn mine(&self) -> Result<Organization, AuthError> {
        self.client.get(MY_ORGANIZATION_PATH).await
    }

    /// # Errors
    ///
    /// Propagates transport and HTTP failures.
    pub async fn create(&self, data: &CreateOrganization) -> Result<Organization, AuthError> {
        tracing::debug!(name = %data.name, "creating organization");
        self.client.post_json(ORGANIZATIONS_PATH, data).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidRequest` for an update with no fields, and
    /// propagates transport and HTTP failures.
    pub async fn update_mine(&self, data: &UpdateOrganization) -> Result<Organization, AuthError> {
        if data.is_empty() {
            return Err(AuthError::InvalidRequest(
                "organization update has no fields".into(),
            ));
        }
        self.client.put_json(MY_ORGANIZATION_PATH, data).await
    }
}
