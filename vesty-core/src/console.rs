//! The command console.
//!
//! A console owns the transcript and a single execution slot. `submit`
//! echoes the command and parks it in the slot; `tick` completes it once
//! the simulated latency has elapsed and records the resolver's answer.
//!
//! Invariants:
//! - at most one command is in flight; a second `submit` is rejected
//! - a command's echo always precedes its result
//! - entry ids strictly increase for the life of the console

use crate::clock::{deadline_after, Clock, SystemClock};
use crate::config::{ConsoleConfig, LateResultPolicy};
use crate::runtime::resolver::{CannedResolver, Invocation, Resolver};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Command,
    Output,
    Error,
}

impl EntryKind {
    /// Upper-case label used by the text export.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Command => "COMMAND",
            EntryKind::Output => "OUTPUT",
            EntryKind::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub content: String,
}

impl LogEntry {
    /// `[HH:MM:SS] KIND: content`, time rendered in the local zone.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            self.kind.label(),
            self.content
        )
    }
}

/// Why a submission was turned away. Nothing was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("a command is already running")]
    AlreadyRunning,
    #[error("input is empty")]
    EmptyInput,
}

/// Receipt for an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seq: u64,
    pub echo: LogEntry,
    pub due: DateTime<Utc>,
}

/// What happened when an in-flight command settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// An `output` or `error` entry was appended.
    Recorded { seq: u64, entry: LogEntry },
    /// The command was a clear token; the transcript is back to the banner.
    ScreenCleared { seq: u64 },
    /// `clear()` ran while the command was in flight and the result was dropped.
    Discarded { seq: u64 },
}

impl Completion {
    pub fn seq(&self) -> u64 {
        match self {
            Completion::Recorded { seq, .. }
            | Completion::ScreenCleared { seq }
            | Completion::Discarded { seq } => *seq,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleStats {
    /// `command` entries currently in the transcript.
    pub commands_executed: usize,
    /// All entries currently in the transcript.
    pub entries: usize,
    /// Accepted submissions since the console was created.
    pub submitted_total: u64,
}

#[derive(Debug, Clone)]
struct InFlight {
    seq: u64,
    invocation: Invocation,
    due: DateTime<Utc>,
    generation: u64,
}

pub struct CommandConsole {
    config: ConsoleConfig,
    resolver: Arc<dyn Resolver>,
    clock: Arc<dyn Clock>,

    transcript: Vec<LogEntry>,
    pending_input: String,

    next_entry_id: u64,
    next_seq: u64,
    // Bumped by every screen reset; an in-flight command from an older
    // generation lost its echo.
    generation: u64,
    in_flight: Option<InFlight>,
}

impl fmt::Debug for CommandConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandConsole")
            .field("entries", &self.transcript.len())
            .field("busy", &self.is_busy())
            .field("generation", &self.generation)
            .finish()
    }
}

impl CommandConsole {
    pub fn new(config: ConsoleConfig, resolver: Arc<dyn Resolver>, clock: Arc<dyn Clock>) -> Self {
        let mut console = Self {
            config,
            resolver,
            clock,
            transcript: Vec::new(),
            pending_input: String::new(),
            next_entry_id: 1,
            next_seq: 1,
            generation: 0,
            in_flight: None,
        };
        console.reset_to_banner();
        console
    }

    /// Reference resolver, wall clock, default settings.
    pub fn with_defaults() -> Self {
        Self::new(
            ConsoleConfig::default(),
            Arc::new(CannedResolver::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Accept a line of input.
    pub fn submit(&mut self, input: &str) -> Result<Ticket, Rejected> {
        let literal = input.trim();
        if literal.is_empty() {
            return Err(Rejected::EmptyInput);
        }
        if self.in_flight.is_some() {
            tracing::debug!(input = %literal, "submission rejected: console busy");
            return Err(Rejected::AlreadyRunning);
        }

        let invocation = Invocation {
            literal: literal.to_string(),
            normalized: self.resolver.normalize(literal),
        };

        // The echo shows the line as typed; only the line terminator goes.
        let typed = input.trim_end_matches(['\r', '\n']);
        let echo = self.push(EntryKind::Command, format!("{}{}", self.config.prompt, typed));

        let seq = self.next_seq;
        self.next_seq += 1;
        let due = deadline_after(echo.timestamp, self.config.latency());

        tracing::info!(seq, command = %invocation.literal, "command accepted");

        self.in_flight = Some(InFlight {
            seq,
            invocation,
            due,
            generation: self.generation,
        });

        Ok(Ticket { seq, echo, due })
    }

    /// Settle the in-flight command if its latency has elapsed.
    pub fn tick(&mut self) -> Option<Completion> {
        let due = self.in_flight.as_ref()?.due;
        if self.clock.now() < due {
            return None;
        }
        let flight = self.in_flight.take()?;
        Some(self.complete(flight))
    }

    fn complete(&mut self, flight: InFlight) -> Completion {
        let InFlight {
            seq,
            invocation,
            generation,
            ..
        } = flight;

        let result = self.resolver.resolve(&invocation);

        if self.is_clear_token(&invocation.normalized) {
            self.reset_to_banner();
            tracing::info!(seq, "screen cleared");
            return Completion::ScreenCleared { seq };
        }

        if generation != self.generation && self.config.late_result == LateResultPolicy::Discard {
            tracing::debug!(seq, command = %invocation.literal, "late result discarded after clear");
            return Completion::Discarded { seq };
        }

        let entry = match result {
            Ok(text) => self.push(EntryKind::Output, text),
            Err(e) => self.push(EntryKind::Error, e.message),
        };
        tracing::info!(seq, kind = ?entry.kind, "command completed");
        Completion::Recorded { seq, entry }
    }

    /// Reset the transcript to the banner. Does not touch an in-flight command.
    pub fn clear(&mut self) {
        self.reset_to_banner();
        tracing::info!(busy = self.is_busy(), "transcript cleared");
    }

    /// When the in-flight command is due, if there is one.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.in_flight.as_ref().map(|f| f.due)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The literal text of the command currently running.
    pub fn running_command(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.invocation.literal.as_str())
    }

    pub fn transcript(&self) -> &[LogEntry] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// One line per entry, in transcript order.
    pub fn export_transcript(&self) -> String {
        self.transcript
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stats(&self) -> ConsoleStats {
        ConsoleStats {
            commands_executed: self
                .transcript
                .iter()
                .filter(|e| e.kind == EntryKind::Command)
                .count(),
            entries: self.transcript.len(),
            submitted_total: self.next_seq - 1,
        }
    }

    // ----------------------------------------------------------------
    // Internals
    // ----------------------------------------------------------------

    fn is_clear_token(&self, normalized: &str) -> bool {
        self.config.clear_tokens.iter().any(|t| t == normalized)
    }

    fn reset_to_banner(&mut self) {
        self.generation += 1;
        self.transcript.clear();
        let banner = self.config.banner.clone();
        self.push(EntryKind::Output, banner);
    }

    fn push(&mut self, kind: EntryKind, content: String) -> LogEntry {
        let entry = LogEntry {
            id: self.next_entry_id,
            timestamp: self.clock.now(),
            kind,
            content,
        };
        self.next_entry_id += 1;
        self.transcript.push(entry.clone());
        entry
    }
}

/// File name for a saved transcript, e.g. `terminal-log-2024-01-15.txt`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("terminal-log-{}.txt", date.format("%Y-%m-%d"))
}
