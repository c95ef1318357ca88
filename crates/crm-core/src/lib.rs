//! # crm-core
//!
//! Domain types shared across the CRM client crates.
//!
//! - Entity structs for the records the backend returns (users, organizations)
//! - Auth request/response shapes for the login and registration endpoints
//! - Dashboard overview types and the reporting period enum
//! - Timestamp parsing tolerant of the backend's naive ISO 8601 output

pub mod auth;
pub mod dashboard;
pub mod entities;
pub mod timestamp;

pub use auth::{AuthResponse, LoginCredentials, RegisterRequest};
pub use dashboard::{DashboardOverview, DashboardPeriod, DashboardSummary};
pub use entities::{CreateOrganization, Organization, UpdateOrganization, User};
