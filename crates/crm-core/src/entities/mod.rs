//! Records returned by the CRM backend.

mod organization;
mod user;

pub use organization::{CreateOrganization, Organization, UpdateOrganization};
pub use user::{FALLBACK_GREETING, User};
