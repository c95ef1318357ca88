//! Pre-configured HTTP client for the CRM backend.
//!
//! Every call goes through the same pipeline: build the request, run the
//! request interceptors in registration order, dispatch, classify the
//! response, then run the response interceptors. Errors are always handed
//! back to the caller after the interceptors have seen them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Request, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AuthError;
use crate::interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor, UnauthorizedGuard};
use crate::navigate::Navigator;
use crate::session::SessionStore;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    #[must_use]
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidRequest` if the underlying client cannot be built.
    pub fn build(self) -> Result<ApiClient, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("crm/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AuthError::InvalidRequest(format!("http client: {e}")))?;

        Ok(ApiClient {
            http,
            base_url: self.base_url.trim().trim_end_matches('/').to_string(),
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: None,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        }
    }

    /// Client wired to a session: bearer credential on every request and the
    /// forced logout on any 401.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRequest` if the underlying client cannot be built.
    pub fn with_session(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        session: &SessionStore,
        navigator: Arc<dyn Navigator>,
        login_route: &str,
    ) -> Result<Self, AuthError> {
        Self::builder(base_url)
            .timeout(timeout)
            .request_interceptor(Arc::new(BearerAuth::new(session.clone())))
            .response_interceptor(Arc::new(UnauthorizedGuard::new(
                session.clone(),
                navigator,
                login_route,
            )))
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// # Errors
    ///
    /// See [`AuthError`]; a 401 also clears the session when the client was
    /// built with [`Self::with_session`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.execute(self.http.request(Method::GET, self.url(path)))
            .await
    }

    /// `GET` with URL-encoded query parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AuthError> {
        let mut url = self.url(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_pairs(query));
        }
        self.execute(self.http.request(Method::GET, url)).await
    }

    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.request(Method::POST, self.url(path)).json(body))
            .await
    }

    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.http.request(Method::PUT, self.url(path)).json(body))
            .await
    }

    /// `POST` with an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, AuthError> {
        let request = self
            .http
            .request(Method::POST, self.url(path))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_pairs(fields));
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AuthError> {
        let request = self.prepare(builder)?;
        let result = self.dispatch(request).await;

        match &result {
            Ok((status, _)) => {
                for interceptor in &self.response_interceptors {
                    interceptor.on_success(*status);
                }
            }
            Err(error) => {
                for interceptor in &self.response_interceptors {
                    interceptor.on_error(error);
                }
            }
        }

        let (_, body) = result?;
        decode(&body)
    }

    fn prepare(&self, builder: RequestBuilder) -> Result<Request, AuthError> {
        let mut request = builder
            .build()
            .map_err(|e| AuthError::InvalidRequest(e.to_string()))?;
        for interceptor in &self.request_interceptors {
            interceptor.intercept(&mut request)?;
        }
        Ok(request)
    }

    async fn dispatch(&self, request: Request) -> Result<(StatusCode, Vec<u8>), AuthError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "dispatching request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(format!("{method} {path}: {e}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Network(format!("{method} {path}: read body: {e}")))?
            .to_vec();

        tracing::debug!(%method, %path, status = status.as_u16(), "response received");
        if status.is_success() {
            Ok((status, body))
        } else {
            Err(AuthError::from_response(status.as_u16(), &body))
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AuthError> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(|e| AuthError::Decode(e.to_string()))
}

fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
