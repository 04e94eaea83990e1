//! Turning engine events into terminal text.

use chrono::{DateTime, Utc};
use vesty_core::{
    EngineEvent, EntryKind, LogEntry, Notification, NotificationEvent, NotificationKind,
    RemovalReason,
};

pub fn entry_line(entry: &LogEntry) -> String {
    match entry.kind {
        EntryKind::Command => format!("➜ {}", entry.content),
        EntryKind::Output => entry.content.clone(),
        EntryKind::Error => format!("❌ {}", entry.content),
    }
}

pub fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✅",
        NotificationKind::Error => "⛔",
        NotificationKind::Warning => "⚠️",
        NotificationKind::Info => "💡",
    }
}

pub fn notification_line(n: &Notification) -> String {
    if n.message.is_empty() {
        format!("{} [{}] {}", kind_icon(n.kind), n.id, n.title)
    } else {
        format!("{} [{}] {}: {}", kind_icon(n.kind), n.id, n.title, n.message)
    }
}

/// Text for one event, or `None` when there is nothing worth printing.
pub fn event_text(event: &EngineEvent) -> Option<String> {
    match event {
        EngineEvent::Entry(entry) => Some(entry_line(entry)),
        EngineEvent::Busy(true) => Some("… running".to_string()),
        EngineEvent::Busy(false) => None,
        EngineEvent::Cleared => Some("── console cleared ──".to_string()),
        EngineEvent::Notification(NotificationEvent::Added(n)) => Some(notification_line(n)),
        EngineEvent::Notification(NotificationEvent::Removed { id, reason }) => {
            let verb = match reason {
                RemovalReason::Dismissed => "dismissed",
                RemovalReason::Expired => "expired",
                RemovalReason::Evicted => "dropped",
            };
            Some(format!("🔕 [{}] {}", id, verb))
        }
    }
}

/// One line per visible notification with its remaining time.
pub fn alerts_table(notifications: &[Notification], now: DateTime<Utc>) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }
    notifications
        .iter()
        .map(|n| {
            format!(
                "{}  ({:.1}s left)",
                notification_line(n),
                n.remaining(now).as_secs_f64()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
