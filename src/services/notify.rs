//! User-facing notifications for failed requests

use reqwest::StatusCode;
use tokio::sync::mpsc;

use crate::error::{AppError, ErrorCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: ErrorCategory,
    pub status: StatusCode,
    pub message: String,
}

impl Notification {
    /// Build the notification for an HTTP error, `None` for any other error
    pub fn from_error(error: &AppError) -> Option<Self> {
        let AppError::Http { status, category, .. } = error else {
            return None;
        };

        let message = error
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| category.user_message().to_string());

        Some(Self {
            category: *category,
            status: *status,
            message,
        })
    }
}

/// Presents notifications to the user. Implementations must not block.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Logs notifications through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.category {
            ErrorCategory::Server => tracing::error!(
                status = notification.status.as_u16(),
                category = %notification.category,
                "{}",
                notification.message
            ),
            _ => tracing::warn!(
                status = notification.status.as_u16(),
                category = %notification.category,
                "{}",
                notification.message
            ),
        }
    }
}

/// Forwards notifications to a channel, e.g. a toast queue drained by the UI
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &Notification) {
        // A closed receiver means nobody is listening anymore
        let _ = self.tx.send(notification.clone());
    }
}
