pub mod auth;
pub mod org;

pub use auth::AuthCommands;
pub use org::OrgCommands;
