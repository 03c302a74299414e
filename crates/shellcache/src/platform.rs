//! Host platform hooks.
//!
//! Notifications, window management, and client claiming are owned by the
//! host environment; the worker only hands off through this trait. The
//! default [`NullPlatform`] logs and does nothing, which is the correct
//! behavior for headless use.

use tracing::info;

/// Badge/icon path attached to notifications.
const NOTIFICATION_ICON: &str = "/logo192.png";

/// A user-visible notification surfaced from a push payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Notification {
    pub fn new(title: String, body: String) -> Self {
        Self {
            title,
            body,
            icon: NOTIFICATION_ICON.to_string(),
        }
    }
}

/// Surface the worker's outward effects to the host environment.
pub trait Platform: Send + Sync {
    /// Show a notification to the user.
    fn show_notification(&self, notification: Notification);

    /// Open or focus a window at the given URL.
    fn open_window(&self, url: &str);

    /// Take control of all open application instances immediately.
    fn claim_clients(&self);
}

/// Platform that logs every handoff and performs no action.
#[derive(Debug, Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    fn show_notification(&self, notification: Notification) {
        info!(title = %notification.title, "notification (no platform attached)");
    }

    fn open_window(&self, url: &str) {
        info!(url, "open window (no platform attached)");
    }

    fn claim_clients(&self) {
        info!("claim clients (no platform attached)");
    }
}
