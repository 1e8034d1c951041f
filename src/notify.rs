//! Notification sink seam.
//!
//! Alert transitions are handed to a [`NotificationSink`] fire-and-forget;
//! no delivery result flows back. The shipped [`LogSink`] emits structured
//! tracing events; deployments wire their own transport behind the trait.

use crate::series::{AlertEvent, AlertKind};

/// A push notification as handed to the sink.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub sound: Option<String>,
}

impl Notification {
    /// Render an alert transition for one location.
    #[must_use]
    pub fn from_alert(location: &str, event: &AlertEvent, sound: Option<String>) -> Self {
        let direction = match event.kind {
            AlertKind::High => "above",
            AlertKind::Low => "below",
        };
        Self {
            title: format!("{} alert: {location}", event.metric.label()),
            body: format!(
                "{} is {:.1} {unit}, {direction} the {:.1} {unit} threshold",
                event.metric.label(),
                event.value,
                event.threshold,
                unit = event.metric.unit(),
            ),
            sound,
        }
    }
}

pub trait NotificationSink: Send + Sync {
    /// Fire-and-forget; implementations must not block the caller on delivery.
    fn send(&self, notification: Notification);
}

/// Sink that records notifications in the log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, notification: Notification) {
        tracing::warn!(
            title = %notification.title,
            body = %notification.body,
            sound = ?notification.sound,
            "notification"
        );
    }
}
