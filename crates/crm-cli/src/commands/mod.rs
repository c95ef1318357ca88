pub mod auth;
pub mod dashboard;
pub mod dispatch;
pub mod org;
pub mod profile;
