use std::sync::Arc;

use crm_auth::navigate::Redirect;
use crm_auth::session::{TOKEN_KEY, USER_KEY};
use crm_auth::storage::KeyValueStore;
use crm_auth::{ApiClient, AuthError, AuthService, MemoryStore, RecordingNavigator, SessionStore};
use crm_core::{LoginCredentials, Organization, RegisterRequest};
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;

struct Harness {
    server: ServerGuard,
    storage: Arc<MemoryStore>,
    session: SessionStore,
    navigator: Arc<RecordingNavigator>,
    service: AuthService,
}

async fn harness() -> Harness {
    let server = Server::new_async().await;
    let storage = Arc::new(MemoryStore::new());
    let session = SessionStore::new(storage.clone());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::with_session(
        format!("{}/api", server.url()),
        None,
        &session,
        navigator.clone(),
        "/login",
    )
    .expect("client");
    let service = AuthService::new(
        Arc::new(client),
        session.clone(),
        navigator.clone(),
        "/login",
    );
    Harness {
        server,
        storage,
        session,
        navigator,
        service,
    }
}

const ORG_BODY: &str = r#"{"id": 7, "name": "Acme", "subscription_plan": "pro"}"#;

#[tokio::test]
async fn login_posts_form_and_persists_token() {
    let mut h = harness().await;
    let mock = h
        .server
        .mock("POST", "/api/auth/login")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "a@b.com".into()),
            Matcher::UrlEncoded("password".into(), "x".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "T1", "token_type": "bearer"}"#)
        .create_async()
        .await;

    let response = h
        .service
        .login(&LoginCredentials::new("a@b.com", "x"))
        .await
        .expect("login");

    mock.assert_async().await;
    assert_eq!(response.access_token, "T1");
    assert!(h.service.is_authenticated());
    assert_eq!(h.session.credential().as_deref(), Some("T1"));
    assert_eq!(h.navigator.count(), 0);
}

#[tokio::test]
async fn requests_carry_bearer_only_when_signed_in() {
    let mut h = harness().await;
    let anonymous = h
        .server
        .mock("GET", "/api/organizations/my-organization")
        .match_header("authorization", Matcher::Missing)
        .with_status(403)
        .with_body(r#"{"detail": "Not authenticated"}"#)
        .create_async()
        .await;
    let signed_in = h
        .server
        .mock("GET", "/api/organizations/my-organization")
        .match_header("authorization", "Bearer T1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ORG_BODY)
        .create_async()
        .await;

    let client = Arc::clone(h.service.client());
    let err = client
        .get::<Organization>("/organizations/my-organization")
        .await
        .expect_err("anonymous");
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.detail(), Some("Not authenticated"));

    h.session.set_credential("T1").expect("seed");
    let org: Organization = client
        .get("/organizations/my-organization")
        .await
        .expect("signed in");

    anonymous.assert_async().await;
    signed_in.assert_async().await;
    assert_eq!(org.name, "Acme");
}

#[tokio::test]
async fn unauthorized_response_clears_session_and_redirects() {
    let mut h = harness().await;
    let login = h
        .server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "T1", "user": {"id": 1, "email": "a@b.com"}}"#)
        .create_async()
        .await;
    let expired = h
        .server
        .mock("GET", "/api/organizations/my-organization")
        .match_header("authorization", "Bearer T1")
        .with_status(401)
        .with_body(r#"{"detail": "Could not validate credentials"}"#)
        .create_async()
        .await;

    h.service
        .login(&LoginCredentials::new("a@b.com", "x"))
        .await
        .expect("login");
    assert_eq!(h.session.credential().as_deref(), Some("T1"));
    assert!(h.session.user().is_some());

    let err = h
        .service
        .client()
        .get::<Organization>("/organizations/my-organization")
        .await
        .expect_err("401");

    login.assert_async().await;
    expired.assert_async().await;
    assert!(err.is_unauthorized());
    assert!(!h.service.is_authenticated());
    assert_eq!(h.storage.get(TOKEN_KEY).expect("read"), None);
    assert_eq!(h.storage.get(USER_KEY).expect("read"), None);
    assert_eq!(
        h.navigator.redirects(),
        vec![Redirect {
            route: "/login".into(),
            reason: Some("Could not validate credentials".into()),
        }]
    );
}

#[tokio::test]
async fn rejected_login_surfaces_detail_and_redirects() {
    let mut h = harness().await;
    let _rejected = h
        .server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(r#"{"detail": "Incorrect email or password"}"#)
        .create_async()
        .await;

    let err = h
        .service
        .login(&LoginCredentials::new("a@b.com", "wrong"))
        .await
        .expect_err("rejected");

    assert!(matches!(err, AuthError::Unauthorized { .. }));
    assert_eq!(err.detail(), Some("Incorrect email or password"));
    assert!(!h.service.is_authenticated());
    assert_eq!(h.navigator.count(), 1);
}

#[tokio::test]
async fn register_persists_token_and_user() {
    let mut h = harness().await;
    let mock = h
        .server
        .mock("POST", "/api/auth/register")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJsonString(
            r#"{"email": "new@b.com", "organization_name": "Acme"}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"access_token": "T2", "token_type": "bearer",
                "user": {"id": 5, "email": "new@b.com", "first_name": "Nia", "organization_id": 7}}"#,
        )
        .create_async()
        .await;

    let request = RegisterRequest {
        email: "new@b.com".into(),
        password: "secret".into(),
        first_name: Some("Nia".into()),
        organization_name: Some("Acme".into()),
        ..RegisterRequest::default()
    };
    h.service.register(&request).await.expect("register");

    mock.assert_async().await;
    assert_eq!(h.session.credential().as_deref(), Some("T2"));
    let user = h.service.current_user().expect("cached user");
    assert_eq!(user.id, 5);
    assert_eq!(user.organization_id, Some(7));
}

#[tokio::test]
async fn validation_errors_are_joined_and_keep_the_session() {
    let mut h = harness().await;
    h.session.set_credential("T1").expect("seed");
    let _invalid = h
        .server
        .mock("POST", "/api/auth/register")
        .with_status(422)
        .with_body(
            r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"},
                           {"loc": ["body", "password"], "msg": "field required"}]}"#,
        )
        .create_async()
        .await;

    let err = h
        .service
        .register(&RegisterRequest {
            email: "nope".into(),
            ..RegisterRequest::default()
        })
        .await
        .expect_err("invalid");

    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.detail(),
        Some("value is not a valid email address; field required")
    );
    assert!(h.service.is_authenticated());
    assert_eq!(h.navigator.count(), 0);
}

#[tokio::test]
async fn logout_removes_both_keys() {
    let h = harness().await;
    h.session.set_credential("T1").expect("token");
    h.session
        .set_user(&serde_json::from_str(r#"{"id": 1, "email": "a@b.com"}"#).expect("user"))
        .expect("user");
    assert_eq!(h.storage.len(), 2);

    h.service.logout().expect("logout");

    assert!(!h.service.is_authenticated());
    assert!(h.storage.is_empty());
    assert_eq!(h.navigator.count(), 0);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let session = SessionStore::in_memory();
    let navigator = Arc::new(RecordingNavigator::new());
    let client =
        ApiClient::with_session("http://127.0.0.1:9/api", None, &session, navigator.clone(), "/login")
            .expect("client");
    let service = AuthService::new(Arc::new(client), session, navigator.clone(), "/login");

    let err = service
        .login(&LoginCredentials::new("a@b.com", "x"))
        .await
        .expect_err("no server");

    assert!(matches!(err, AuthError::Network(_)));
    assert_eq!(navigator.count(), 0);
}

#[tokio::test]
async fn unreadable_credential_rejects_request_before_sending() {
    let mut server = Server::new_async().await;
    let tmp = tempfile::TempDir::new().expect("tmp dir");
    std::fs::write(tmp.path().join(TOKEN_KEY), [0xff, 0xfe]).expect("write token");
    let session = SessionStore::on_disk(tmp.path());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::with_session(
        format!("{}/api", server.url()),
        None,
        &session,
        navigator.clone(),
        "/login",
    )
    .expect("client");
    let mock = server
        .mock("GET", "/api/organizations/my-organization")
        .expect(0)
        .create_async()
        .await;

    let err = client
        .get::<Organization>("/organizations/my-organization")
        .await
        .expect_err("unreadable credential");

    mock.assert_async().await;
    assert!(matches!(err, AuthError::Storage(_)));
    assert_eq!(navigator.count(), 0);
}
