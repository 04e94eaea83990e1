//! The notification center.
//!
//! Every page reports outcomes through `add`. Each notification counts down
//! on its own timer and disappears when the timer fires or when the user
//! dismisses it, whichever happens first. The queue keeps insertion order:
//! oldest first, newest at the tail.

use crate::clock::{deadline_after, time_until, Clock, SystemClock};
use crate::config::NotificationConfig;
use crate::timer::{Scheduler, TimerHandle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn expires_at(&self) -> DateTime<Utc> {
        deadline_after(self.created_at, self.duration)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        time_until(now, self.expires_at())
    }

    /// Share of the lifetime already used, `0.0..=1.0`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let left = self.remaining(now).as_secs_f64() / self.duration.as_secs_f64();
        (1.0 - left).clamp(0.0, 1.0)
    }
}

/// Why a notification left the queue. Only logging cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    Dismissed,
    Expired,
    /// Pushed out by a newer one when the queue is capped.
    Evicted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Added(Notification),
    Removed {
        id: NotificationId,
        reason: RemovalReason,
    },
}

#[derive(Debug)]
struct Slot {
    notification: Notification,
    timer: TimerHandle,
}

pub struct NotificationCenter {
    config: NotificationConfig,
    clock: Arc<dyn Clock>,
    queue: VecDeque<Slot>,
    timers: Scheduler<NotificationId>,
    next_id: u64,
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("visible", &self.queue.len())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            queue: VecDeque::new(),
            timers: Scheduler::new(),
            next_id: 1,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(NotificationConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Enqueue a notification and start its countdown.
    ///
    /// `duration` falls back to the configured default. If the queue is
    /// capped and full, the oldest notifications are evicted first.
    pub fn add(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> NotificationId {
        self.add_with_events(kind, title, message, duration).0
    }

    /// Same as `add`, also reporting every queue change it caused.
    pub fn add_with_events(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> (NotificationId, Vec<NotificationEvent>) {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        assert!(
            !self.contains(id),
            "notification id {} issued twice; id generation is broken",
            id
        );

        let mut events = Vec::new();
        if let Some(cap) = self.config.max_visible {
            while self.queue.len() >= cap.max(1) {
                let Some(oldest) = self.queue.front().map(|s| s.notification.id) else {
                    break;
                };
                if self.take(oldest, RemovalReason::Evicted) {
                    events.push(NotificationEvent::Removed {
                        id: oldest,
                        reason: RemovalReason::Evicted,
                    });
                }
            }
        }

        let notification = Notification {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            duration: duration.unwrap_or_else(|| self.config.default_duration()),
            created_at: self.clock.now(),
        };
        let timer = self.timers.schedule(notification.expires_at(), id);

        tracing::info!(
            %id,
            kind = kind.name(),
            title = %notification.title,
            duration_ms = u64::try_from(notification.duration.as_millis()).unwrap_or(u64::MAX),
            "notification added"
        );

        events.push(NotificationEvent::Added(notification.clone()));
        self.queue.push_back(Slot {
            notification,
            timer,
        });
        (id, events)
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Success, title, message, None)
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Error, title, message, None)
    }

    pub fn warning(&mut self, title: impl Into<String>, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Warning, title, message, None)
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Info, title, message, None)
    }

    /// Dismiss a notification early. Unknown ids are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        self.take(id, RemovalReason::Dismissed)
    }

    /// Fire every expiry that is due and report the removals.
    pub fn tick(&mut self) -> Vec<NotificationEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();
        for (_, id) in self.timers.drain_due(now) {
            if self.take(id, RemovalReason::Expired) {
                events.push(NotificationEvent::Removed {
                    id,
                    reason: RemovalReason::Expired,
                });
            }
        }
        events
    }

    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.queue
            .iter()
            .map(|s| &s.notification)
            .find(|n| n.id == id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.get(id).is_some()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter().map(|s| &s.notification)
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.iter().map(|n| n.id).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn take(&mut self, id: NotificationId, reason: RemovalReason) -> bool {
        let Some(pos) = self.queue.iter().position(|s| s.notification.id == id) else {
            return false;
        };
        let Some(slot) = self.queue.remove(pos) else {
            return false;
        };
        // Already gone when we got here through an expiry.
        self.timers.cancel(slot.timer);
        tracing::info!(%id, reason = ?reason, "notification removed");
        true
    }
}
