use crate::clock::{time_until, Clock};
use crate::config::CoreConfig;
use crate::console::{CommandConsole, Completion, ConsoleStats, LogEntry, Rejected, Ticket};
use crate::notifications::{
    Notification, NotificationCenter, NotificationEvent, NotificationId, NotificationKind,
    RemovalReason,
};
use crate::runtime::resolver::Resolver;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;

/// Everything a front-end needs to redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A transcript entry was appended.
    Entry(LogEntry),
    /// The console went busy (`true`) or idle (`false`).
    Busy(bool),
    /// The transcript was reset to the banner.
    Cleared,
    Notification(NotificationEvent),
}

/// The main entry point for the core.
/// The front-end holds one instance of this.
///
/// Both components stay behind the engine so every mutation goes through a
/// method that reports it and wakes the pump.
#[derive(Debug)]
pub struct VestyEngine {
    console: Arc<Mutex<CommandConsole>>,
    notifications: Arc<Mutex<NotificationCenter>>,
    events: mpsc::UnboundedSender<EngineEvent>,
    // Pokes the pump after any call that moves a deadline.
    wake: Arc<Notify>,
    pump: JoinHandle<()>,
}

impl VestyEngine {
    /// Builds both components and spawns the timer pump.
    /// Must be called from inside a tokio runtime.
    pub fn start(
        config: CoreConfig,
        resolver: Arc<dyn Resolver>,
        clock: Arc<dyn Clock>,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let console = Arc::new(Mutex::new(CommandConsole::new(
            config.console,
            resolver,
            clock.clone(),
        )));
        let notifications = Arc::new(Mutex::new(NotificationCenter::new(
            config.notifications,
            clock.clone(),
        )));
        let wake = Arc::new(Notify::new());

        let pump = tokio::spawn(pump(
            console.clone(),
            notifications.clone(),
            clock,
            wake.clone(),
            event_tx.clone(),
        ));

        let engine = Self {
            console,
            notifications,
            events: event_tx,
            wake,
            pump,
        };
        (engine, event_rx)
    }

    // ----------------------------------------------------------------
    // Console
    // ----------------------------------------------------------------

    /// User pressed enter -> echo now, result once the pump settles it.
    ///
    /// Events are sent while the console is locked so a front-end always
    /// sees them in transcript order.
    pub async fn submit(&self, input: &str) -> Result<Ticket, Rejected> {
        let mut console = self.console.lock().await;
        let ticket = console.submit(input)?;
        self.emit(EngineEvent::Entry(ticket.echo.clone()));
        self.emit(EngineEvent::Busy(true));
        drop(console);
        self.wake.notify_one();
        Ok(ticket)
    }

    pub async fn clear(&self) {
        let mut console = self.console.lock().await;
        console.clear();
        self.emit(EngineEvent::Cleared);
    }

    pub async fn is_busy(&self) -> bool {
        self.console.lock().await.is_busy()
    }

    pub async fn transcript(&self) -> Vec<LogEntry> {
        self.console.lock().await.transcript().to_vec()
    }

    pub async fn export_transcript(&self) -> String {
        self.console.lock().await.export_transcript()
    }

    pub async fn stats(&self) -> ConsoleStats {
        self.console.lock().await.stats()
    }

    // ----------------------------------------------------------------
    // Notifications
    // ----------------------------------------------------------------

    pub async fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> NotificationId {
        let mut center = self.notifications.lock().await;
        let (id, events) = center.add_with_events(kind, title, message, duration);
        for ev in events {
            self.emit(EngineEvent::Notification(ev));
        }
        drop(center);
        self.wake.notify_one();
        id
    }

    pub async fn dismiss(&self, id: NotificationId) -> bool {
        let mut center = self.notifications.lock().await;
        let removed = center.remove(id);
        if removed {
            self.emit(EngineEvent::Notification(NotificationEvent::Removed {
                id,
                reason: RemovalReason::Dismissed,
            }));
        }
        drop(center);
        if removed {
            self.wake.notify_one();
        }
        removed
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.iter().cloned().collect()
    }

    /// Stop the pump. Pending countdowns and commands are abandoned.
    pub async fn shutdown(self) -> Result<()> {
        self.pump.abort();
        match self.pump.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(e).context("engine pump task failed"),
        }
    }

    fn emit(&self, event: EngineEvent) {
        send(&self.events, event);
    }
}

/// Sleeps until the earliest deadline of either component, ticks both and
/// forwards what happened.
async fn pump(
    console: Arc<Mutex<CommandConsole>>,
    notifications: Arc<Mutex<NotificationCenter>>,
    clock: Arc<dyn Clock>,
    wake: Arc<Notify>,
    events: mpsc::UnboundedSender<EngineEvent>,
) {
    tracing::debug!("engine pump started");
    loop {
        let console_due = console.lock().await.next_deadline();
        let notification_due = notifications.lock().await.next_deadline();
        let next = match (console_due, notification_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        match next {
            Some(deadline) => {
                let wait = time_until(clock.now(), deadline);
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = wake.notified() => continue,
                }
            }
            None => {
                wake.notified().await;
                continue;
            }
        }

        // Send under each lock so pump events never overtake a later submit.
        {
            let mut console = console.lock().await;
            if let Some(done) = console.tick() {
                match done {
                    Completion::Recorded { entry, .. } => send(&events, EngineEvent::Entry(entry)),
                    Completion::ScreenCleared { .. } => send(&events, EngineEvent::Cleared),
                    Completion::Discarded { .. } => {}
                }
                send(&events, EngineEvent::Busy(false));
            }
        }

        {
            let mut center = notifications.lock().await;
            for ev in center.tick() {
                send(&events, EngineEvent::Notification(ev));
            }
        }
    }
}

// Nobody listening is fine; the state is still readable.
fn send(events: &mpsc::UnboundedSender<EngineEvent>, event: EngineEvent) {
    if events.send(event).is_err() {
        tracing::trace!("event receiver dropped");
    }
}
