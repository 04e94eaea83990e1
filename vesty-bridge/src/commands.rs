//! Front-end `!` commands.
//!
//! Anything that does not start with `!` goes to the console unchanged.
//! The `!` commands act on the dashboard around the console: saving the
//! log, raising and dismissing notifications, and quitting.

use std::time::Duration;
use vesty_core::{NotificationId, NotificationKind};

#[derive(Debug, PartialEq)]
pub enum BridgeCommand {
    /// Plain input for the console.
    Console(String),
    Clear,
    Save,
    Notify {
        kind: NotificationKind,
        title: String,
        message: String,
        duration: Option<Duration>,
    },
    Dismiss(NotificationId),
    Alerts,
    Stats,
    Help,
    Exit,
    /// A `!` command with bad arguments. Carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

pub const NOTIFY_USAGE: &str = "Usage: !notify <success|error|warning|info> <title> | <message> [| <ms>]";
pub const DISMISS_USAGE: &str = "Usage: !dismiss <id>   (e.g. !dismiss n3)";

pub struct BridgeParser;

impl BridgeParser {
    pub fn parse(input: &str) -> BridgeCommand {
        let trimmed = input.trim();

        let Some(rest) = trimmed.strip_prefix('!') else {
            return BridgeCommand::Console(input.to_string());
        };

        let (cmd, args) = match rest.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (rest, ""),
        };

        match cmd.to_ascii_lowercase().as_str() {
            "clear" | "cls" => BridgeCommand::Clear,
            "save" => BridgeCommand::Save,
            "alerts" | "notifications" => BridgeCommand::Alerts,
            "stats" => BridgeCommand::Stats,
            "help" => BridgeCommand::Help,
            "exit" | "quit" => BridgeCommand::Exit,
            "notify" => parse_notify(args),
            "dismiss" => match parse_id(args) {
                Some(id) => BridgeCommand::Dismiss(id),
                None => BridgeCommand::Usage(DISMISS_USAGE),
            },
            other => BridgeCommand::Unknown(other.to_string()),
        }
    }
}

fn parse_notify(args: &str) -> BridgeCommand {
    let Some((kind, rest)) = args.split_once(char::is_whitespace) else {
        return BridgeCommand::Usage(NOTIFY_USAGE);
    };
    let Some(kind) = NotificationKind::from_name(kind) else {
        return BridgeCommand::Usage(NOTIFY_USAGE);
    };

    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    let (title, message, duration) = match parts.as_slice() {
        [title, message] => (*title, *message, None),
        [title, message, ms] => match ms.parse::<u64>() {
            Ok(ms) => (*title, *message, Some(Duration::from_millis(ms))),
            Err(_) => return BridgeCommand::Usage(NOTIFY_USAGE),
        },
        _ => return BridgeCommand::Usage(NOTIFY_USAGE),
    };
    if title.is_empty() {
        return BridgeCommand::Usage(NOTIFY_USAGE);
    }

    BridgeCommand::Notify {
        kind,
        title: title.to_string(),
        message: message.to_string(),
        duration,
    }
}

/// Accepts `n3` (as displayed) or a bare `3`.
fn parse_id(args: &str) -> Option<NotificationId> {
    let raw = args.trim();
    let digits = raw.strip_prefix('n').unwrap_or(raw);
    digits.parse::<u64>().ok().map(NotificationId)
}

pub fn help_text() -> String {
    [
        "Vesty front-end commands:",
        "",
        "  !help              Show this help",
        "  !clear, !cls       Clear the console",
        "  !save              Save the console log to terminal-log-<date>.txt",
        "  !stats             Commands executed / log lines",
        "  !alerts            List visible notifications",
        "  !notify <kind> <title> | <message> [| <ms>]",
        "                     Raise a notification",
        "  !dismiss <id>      Dismiss a notification",
        "  !exit, !quit       Leave",
        "",
        "  Anything else is sent to the console (try `help`).",
    ]
    .join("\n")
}
