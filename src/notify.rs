//! Append-only notification stream consumed by the presentation layer.
//!
//! Each pipeline transition appends at most one event. Events carry their
//! own expiry clock and fall out of the log 5 seconds after creation,
//! independent of whatever the pipeline does next; rendering and dismissal
//! are the host's concern.

use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

/// How long an event stays active before hosts may drop it.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

impl NotificationEvent {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= NOTIFICATION_TTL
    }
}

/// The event log itself. Writers only ever append; expired events are
/// removed by [`NotificationLog::prune`], which hosts call on their own
/// schedule.
#[derive(Debug, Default)]
pub struct NotificationLog {
    events: Vec<NotificationEvent>,
}

impl NotificationLog {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> Uuid {
        let event = NotificationEvent {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at: Instant::now(),
        };
        debug!(id = %event.id, severity = ?event.severity, message = %event.message, "Notification emitted");
        let id = event.id;
        self.events.push(event);
        id
    }

    /// Every event still in the log, expired or not.
    pub fn events(&self) -> &[NotificationEvent] {
        &self.events
    }

    /// Events still visible at `now`.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &NotificationEvent> {
        self.events.iter().filter(move |event| !event.is_expired(now))
    }

    /// Drops events whose TTL has elapsed at `now`.
    pub fn prune(&mut self, now: Instant) {
        self.events.retain(|event| !event.is_expired(now));
    }

    pub fn latest(&self) -> Option<&NotificationEvent> {
        self.events.last()
    }
}
