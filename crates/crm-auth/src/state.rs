//! Observable authentication state for a front end.
//!
//! [`AuthSession`] owns an [`AuthState`] snapshot and keeps it in step with
//! the [`AuthService`] calls it forwards. Rendering is left to the caller.

use crm_core::{LoginCredentials, RegisterRequest, User};
use serde::Serialize;

use crate::error::AuthError;
use crate::service::AuthService;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    /// Loading, nothing known yet. [`AuthSession::init`] resolves it.
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
            error: None,
        }
    }
}

impl AuthState {
    const fn signed_out() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct AuthSession {
    service: AuthService,
    state: AuthState,
}

impl AuthSession {
    #[must_use]
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            state: AuthState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn service(&self) -> &AuthService {
        &self.service
    }

    /// Restore state from the session store.
    ///
    /// A stored credential is enough to count as signed in; the cached user is
    /// attached when present.
    pub fn init(&mut self) -> &AuthState {
        self.state = match self.service.credential() {
            Some(token) => AuthState {
                user: self.service.session().user(),
                token: Some(token),
                is_authenticated: true,
                is_loading: false,
                error: None,
            },
            None => AuthState::signed_out(),
        };
        &self.state
    }

    /// # Errors
    ///
    /// Re-raises the service error after recording its message in
    /// [`AuthState::error`].
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<&AuthState, AuthError> {
        self.begin();
        match self.service.login(credentials).await {
            Ok(response) => {
                self.signed_in(response.user, response.access_token);
                Ok(&self.state)
            }
            Err(error) => Err(self.failed(error, LOGIN_FAILED)),
        }
    }

    /// # Errors
    ///
    /// Same as [`Self::login`].
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<&AuthState, AuthError> {
        self.begin();
        match self.service.register(request).await {
            Ok(response) => {
                self.signed_in(response.user, response.access_token);
                Ok(&self.state)
            }
            Err(error) => Err(self.failed(error, REGISTRATION_FAILED)),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session could not be cleared. The
    /// state is reset either way.
    pub fn logout(&mut self) -> Result<&AuthState, AuthError> {
        let result = self.service.logout();
        self.state = AuthState::signed_out();
        result.map(|()| &self.state)
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn signed_in(&mut self, user: Option<User>, token: String) {
        self.state = AuthState {
            user: user.or_else(|| self.service.session().user()),
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
            error: None,
        };
    }

    fn failed(&mut self, error: AuthError, fallback: &str) -> AuthError {
        // A 401 has already wiped the store.
        if error.is_unauthorized() {
            self.state.user = None;
            self.state.token = None;
            self.state.is_authenticated = false;
        }
        self.state.error = Some(error.detail().unwrap_or(fallback).to_string());
        self.state.is_loading = false;
        error
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::ApiClient;
    use crate::navigate::NoopNavigator;
    use crate::session::SessionStore;

    fn session_with(store: &SessionStore) -> AuthSession {
        let client = ApiClient::builder("http://127.0.0.1:9/api")
            .build()
            .expect("client");
        AuthSession::new(AuthService::new(
            Arc::new(client),
            store.clone(),
            Arc::new(NoopNavigator),
            "/login",
        ))
    }

    #[test]
    fn starts_loading() {
        let session = session_with(&SessionStore::in_memory());
        assert!(session.state().is_loading);
        assert!(!session.state().is_authenticated);
    }

    #[test]
    fn init_without_credential_is_signed_out() {
        let mut session = session_with(&SessionStore::in_memory());
        assert_eq!(session.init(), &AuthState::signed_out());
    }

    #[test]
    fn init_restores_credential_and_user() {
        let store = SessionStore::in_memory();
        let user: User = serde_json::from_str(r#"{"id": 3, "email": "c@d.com"}"#).expect("user");
        store.set_credential("T9").expect("token");
        store.set_user(&user).expect("user");

        let mut session = session_with(&store);
        let state = session.init().clone();

        assert_eq!(
            state,
            AuthState {
                user: Some(user),
                token: Some("T9".into()),
                is_authenticated: true,
                is_loading: false,
                error: None,
            }
        );
    }

    #[test]
    fn init_with_credential_but_no_user_stays_signed_in() {
        let store = SessionStore::in_memory();
        store.set_credential("T9").expect("token");

        let mut session = session_with(&store);
        let state = session.init();

        assert!(state.is_authenticated);
        assert!(state.user.is_none());
        assert!(store.is_authenticated());
    }

    #[test]
    fn failure_records_server_detail_or_fallback() {
        let mut session = session_with(&SessionStore::in_memory());

        let error = session.failed(
            AuthError::Http {
                status: 400,
                detail: Some("Email already registered".into()),
            },
            REGISTRATION_FAILED,
        );
        assert_eq!(error.status(), Some(400));
        assert_eq!(
            session.state().error.as_deref(),
            Some("Email already registered")
        );

        session.failed(AuthError::Network("refused".into()), LOGIN_FAILED);
        assert_eq!(session.state().error.as_deref(), Some(LOGIN_FAILED));
        assert!(!session.state().is_loading);
    }

    #[test]
    fn logout_resets_state() {
        let store = SessionStore::in_memory();
        store.set_credential("T1").expect("token");
        let mut session = session_with(&store);
        session.init();

        let state = session.logout().expect("logout").clone();

        assert_eq!(state, AuthState::signed_out());
        assert!(!store.is_authenticated());
    }
}
