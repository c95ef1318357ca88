//! Navigation policies invoked when the session must go back to login.
//!
//! The response interceptor never navigates on its own; it calls the
//! [`Navigator`] it was given. Front ends plug in whatever "go to the login
//! screen" means for them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::flash::FlashStore;

/// Notice stored when a forced logout carries no server message.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

pub trait Navigator: Send + Sync + fmt::Debug {
    /// Send the user to `route`. `reason` is the server's message, if any.
    fn redirect_to_login(&self, route: &str, reason: Option<&str>);
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self, _route: &str, _reason: Option<&str>) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: String,
    pub reason: Option<String>,
}

/// Records every redirect it is asked to perform.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<Redirect>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redirects(&self) -> Vec<Redirect> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self, route: &str, reason: Option<&str>) {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Redirect {
                route: route.to_string(),
                reason: reason.map(str::to_string),
            });
    }
}

/// Parks the reason in the flash store for the next login prompt.
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    flash: FlashStore,
}

impl FlashRedirect {
    #[must_use]
    pub const fn new(flash: FlashStore) -> Self {
        Self { flash }
    }
}

impl Navigator for FlashRedirect {
    fn redirect_to_login(&self, route: &str, reason: Option<&str>) {
        let notice = reason.unwrap_or(SESSION_EXPIRED_NOTICE);
        if let Err(error) = self.flash.store_login_error(notice) {
            tracing::warn!(%error, "failed to store login notice");
        }
        tracing::info!(route, "session cleared; login required");
    }
}
