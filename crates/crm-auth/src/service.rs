//! Login, registration and logout against the backend's auth endpoints.

use std::sync::Arc;

use crm_core::{AuthResponse, LoginCredentials, RegisterRequest, User};

use crate::client::ApiClient;
use crate::error::AuthError;
use crate::navigate::Navigator;
use crate::session::SessionStore;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl AuthService {
    pub fn new(
        client: Arc<ApiClient>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            client,
            session,
            navigator,
            login_route: login_route.into(),
        }
    }

    /// Exchange credentials for a bearer token and persist the session.
    ///
    /// The pair is sent as `application/x-www-form-urlencoded`, which is what
    /// the backend's token endpoint accepts.
    ///
    /// # Errors
    ///
    /// Propagates transport and HTTP failures, and `AuthError::Storage` if the
    /// session cannot be written.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, AuthError> {
        let response: AuthResponse = self
            .client
            .post_form(LOGIN_PATH, &credentials.form_fields())
            .await?;
        self.persist(&response)?;
        tracing::info!(username = %credentials.username, "login succeeded; session stored");
        Ok(response)
    }

    /// Create an account and persist the session it returns.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let response: AuthResponse = self.client.post_json(REGISTER_PATH, request).await?;
        self.persist(&response)?;
        tracing::info!(email = %request.email, "registration succeeded; session stored");
        Ok(response)
    }

    fn persist(&self, response: &AuthResponse) -> Result<(), AuthError> {
        // A record cached by an earlier login may describe another account,
        // so it goes before the new credential is written.
        self.session.clear_user()?;
        self.session.set_credential(&response.access_token)?;
        match &response.user {
            Some(user) => self.session.set_user(user),
            None => Ok(()),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if a stored key cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Clear the session and send the user to the login route.
    ///
    /// # Errors
    ///
    /// Same as [`Self::logout`]; the redirect still happens on failure.
    pub fn logout_and_redirect(&self) -> Result<(), AuthError> {
        let result = self.logout();
        self.navigator.redirect_to_login(&self.login_route, None);
        result
    }

    /// Credential presence only. Validity is decided by the backend.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.session.credential()
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when no user record is cached.
    pub fn current_user(&self) -> Result<User, AuthError> {
        self.session.user().ok_or(AuthError::NotAuthenticated)
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}
