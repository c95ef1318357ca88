//! # crm-auth
//!
//! Session handling and authenticated HTTP access to the CRM backend.
//!
//! Provides the persistent session store (credential + cached user), the
//! bearer request interceptor, the 401 forced-logout response interceptor
//! with an injectable [`Navigator`], the login/register/logout operations,
//! and thin services for the organization and dashboard endpoints.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod flash;
pub mod interceptor;
pub mod navigate;
pub mod org;
pub mod service;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;

pub use client::ApiClient;
pub use dashboard::DashboardService;
pub use error::AuthError;
pub use flash::FlashStore;
pub use navigate::{FlashRedirect, Navigator, NoopNavigator, RecordingNavigator};
pub use org::OrganizationService;
pub use service::AuthService;
pub use session::SessionStore;
pub use state::{AuthSession, AuthState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
