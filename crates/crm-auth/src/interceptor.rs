//! Request and response hooks run by [`crate::client::ApiClient`].

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, StatusCode};

use crate::error::AuthError;
use crate::navigate::Navigator;
use crate::session::SessionStore;

/// Runs on every outgoing request, after it is built and before dispatch.
pub trait RequestInterceptor: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// An error rejects the request; nothing is sent.
    fn intercept(&self, request: &mut Request) -> Result<(), AuthError>;
}

/// Runs on every inbound response.
pub trait ResponseInterceptor: Send + Sync + fmt::Debug {
    fn on_success(&self, _status: StatusCode) {}

    /// Sees the error before it is returned to the caller. Cannot swallow it.
    fn on_error(&self, error: &AuthError);
}

/// Attaches `Authorization: Bearer <credential>` when a credential is stored.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: SessionStore,
}

impl BearerAuth {
    #[must_use]
    pub const fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: &mut Request) -> Result<(), AuthError> {
        let Some(token) = self.session.try_credential()? else {
            return Ok(());
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AuthError::InvalidRequest(format!("authorization header: {e}")))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Forces a logout on any 401: clears the session, then navigates to login.
#[derive(Debug, Clone)]
pub struct UnauthorizedGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl UnauthorizedGuard {
    pub fn new(
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            session,
            navigator,
            login_route: login_route.into(),
        }
    }
}

impl ResponseInterceptor for UnauthorizedGuard {
    fn on_error(&self, error: &AuthError) {
        if !error.is_unauthorized() {
            return;
        }
        tracing::warn!(detail = ?error.detail(), "backend rejected credentials; clearing session");
        if let Err(clear_error) = self.session.clear() {
            tracing::warn!(error = %clear_error, "failed to clear session after 401");
        }
        self.navigator
            .redirect_to_login(&self.login_route, error.detail());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::navigate::RecordingNavigator;

    fn build_request() -> Request {
        reqwest::Client::new()
            .get("http://localhost:8000/api/organizations")
            .build()
            .expect("request")
    }

    #[test]
    fn bearer_attached_when_credential_present() {
        let session = SessionStore::in_memory();
        session.set_credential("T1").expect("set");
        let mut request = build_request();

        BearerAuth::new(session).intercept(&mut request).expect("intercept");

        let header = request.headers().get(AUTHORIZATION).expect("header");
        assert_eq!(header.to_str().expect("ascii"), "Bearer T1");
        assert!(header.is_sensitive());
    }

    #[test]
    fn no_header_without_credential() {
        let mut request = build_request();
        BearerAuth::new(SessionStore::in_memory())
            .intercept(&mut request)
            .expect("intercept");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn unencodable_credential_rejects_request() {
        let session = SessionStore::in_memory();
        session.set_credential("bad\u{7f}token").expect("set");
        let mut request = build_request();

        let err = BearerAuth::new(session)
            .intercept(&mut request)
            .expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidRequest(_)));
    }

    #[test]
    fn guard_clears_and_redirects_on_401() {
        let session = SessionStore::in_memory();
        session.set_credential("T1").expect("set");
        let navigator = Arc::new(RecordingNavigator::new());
        let guard = UnauthorizedGuard::new(session.clone(), navigator.clone(), "/login");

        guard.on_error(&AuthError::Unauthorized {
            detail: Some("Could not validate credentials".into()),
        });

        assert!(!session.is_authenticated());
        let redirects = navigator.redirects();
        assert_eq!(redirects.len(), 1);
        assert_eq!(redirects[0].route, "/login");
        assert_eq!(
            redirects[0].reason.as_deref(),
            Some("Could not validate credentials")
        );
    }

    #[test]
    fn guard_ignores_other_errors() {
        let session = SessionStore::in_memory();
        session.set_credential("T1").expect("set");
        let navigator = Arc::new(RecordingNavigator::new());
        let guard = UnauthorizedGuard::new(session.clone(), navigator.clone(), "/login");

        guard.on_error(&AuthError::Http {
            status: 403,
            detail: None,
        });
        guard.on_error(&AuthError::Network("timeout".into()));

        assert!(session.is_authenticated());
        assert_eq!(navigator.count(), 0);
    }
}
