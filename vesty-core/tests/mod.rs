use vesty_core::runtime::parser::{BuiltinCommand, CommandParser, CommandType};
use vesty_core::{
    export_file_name, CannedResolver, Clock, CommandConsole, Completion, ConsoleConfig,
    CoreConfig, EntryKind, Invocation, LateResultPolicy, ManualClock, Rejected, ResolveError,
    Resolver,
};

use chrono::NaiveDate;
use std::sync::Arc;

const BANNER: &str = "VestyWinBox Terminal v1.0.0 - Ready";

fn console_with(config: ConsoleConfig) -> (CommandConsole, ManualClock) {
    let clock = ManualClock::at_epoch();
    let console = CommandConsole::new(config, Arc::new(CannedResolver::new()), Arc::new(clock.clone()));
    (console, clock)
}

fn console() -> (CommandConsole, ManualClock) {
    console_with(ConsoleConfig::default())
}

/// Submit and let the simulated latency run out.
fn run(console: &mut CommandConsole, clock: &ManualClock, input: &str) -> Completion {
    console.submit(input).unwrap();
    clock.advance(console.config().latency());
    console.tick().expect("command should settle once latency elapsed")
}

// ============================================================================
// Fresh console
// ============================================================================

#[test]
fn test_new_console_shows_banner() {
    let (console, _) = console();
    let t = console.transcript();
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].kind, EntryKind::Output);
    assert_eq!(t[0].content, BANNER);
    assert!(!console.is_busy());
}

#[test]
fn test_console_debug() {
    let (console, _) = console();
    let debug = format!("{:?}", console);
    assert!(debug.contains("CommandConsole"));
}

// ============================================================================
// Submission
// ============================================================================

#[test]
fn test_submit_echoes_with_prompt() {
    let (mut console, _) = console();
    let ticket = console.submit("help").unwrap();
    assert_eq!(ticket.echo.kind, EntryKind::Command);
    assert_eq!(ticket.echo.content, "> help");
    assert_eq!(console.transcript().last().unwrap(), &ticket.echo);
    assert!(console.is_busy());
    assert_eq!(console.running_command(), Some("help"));
}

#[test]
fn test_submit_echo_keeps_typed_input() {
    let (mut console, _) = console();
    let ticket = console.submit("help   ").unwrap();
    assert!(ticket.echo.content.contains("help   "));
    assert_eq!(ticket.echo.content, "> help   ");
}

#[test]
fn test_submit_echo_drops_line_terminator_only() {
    let (mut console, _) = console();
    let ticket = console.submit("   dir  \r\n").unwrap();
    assert_eq!(ticket.echo.content, ">    dir  ");
    assert_eq!(console.running_command(), Some("dir"));
}

#[test]
fn test_padded_input_still_resolves() {
    let (mut console, clock) = console();
    match run(&mut console, &clock, "  help   ") {
        Completion::Recorded { entry, .. } => {
            assert_eq!(entry.kind, EntryKind::Output);
            assert!(entry.content.contains("systeminfo"));
        }
        other => panic!("Expected Recorded, got {:?}", other),
    }
    assert_eq!(console.transcript()[1].content, ">   help   ");
}

#[test]
fn test_submit_empty_rejected() {
    let (mut console, _) = console();
    for blank in ["", "   ", "\t\n"] {
        assert_eq!(console.submit(blank), Err(Rejected::EmptyInput));
    }
    assert_eq!(console.transcript().len(), 1);
    assert!(!console.is_busy());
}

#[test]
fn test_submit_while_busy_rejected() {
    let (mut console, _) = console();
    console.submit("dir").unwrap();
    let before = console.transcript().to_vec();

    assert_eq!(console.submit("ipconfig"), Err(Rejected::AlreadyRunning));
    assert_eq!(console.transcript(), before.as_slice());
    assert_eq!(console.running_command(), Some("dir"));
}

#[test]
fn test_blank_input_checked_before_busy() {
    let (mut console, _) = console();
    console.submit("dir").unwrap();
    assert_eq!(console.submit("  "), Err(Rejected::EmptyInput));
}

#[test]
fn test_rejection_messages() {
    assert_eq!(Rejected::AlreadyRunning.to_string(), "a command is already running");
    assert_eq!(Rejected::EmptyInput.to_string(), "input is empty");
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_nothing_settles_before_latency() {
    let (mut console, clock) = console();
    console.submit("dir").unwrap();
    clock.advance_ms(999);
    assert!(console.tick().is_none());
    assert!(console.is_busy());
    assert_eq!(console.transcript().len(), 2);
}

#[test]
fn test_submit_produces_echo_then_result() {
    let (mut console, clock) = console();
    let done = run(&mut console, &clock, "dir");

    let t = console.transcript();
    assert_eq!(t.len(), 3);
    assert_eq!(t[1].kind, EntryKind::Command);
    assert_eq!(t[2].kind, EntryKind::Output);
    assert!(t[2].content.contains("Directory of C:\\Users\\Admin"));
    assert!(t[1].id < t[2].id);
    assert!(!console.is_busy());

    match done {
        Completion::Recorded { entry, seq } => {
            assert_eq!(seq, 1);
            assert_eq!(&entry, &t[2]);
        }
        other => panic!("Expected Recorded, got {:?}", other),
    }
}

#[test]
fn test_tick_when_idle_is_noop() {
    let (mut console, clock) = console();
    clock.advance_ms(10_000);
    assert!(console.tick().is_none());
    assert_eq!(console.transcript().len(), 1);
}

#[test]
fn test_result_recorded_exactly_once() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "ipconfig");
    clock.advance_ms(5_000);
    assert!(console.tick().is_none());
    assert_eq!(console.transcript().len(), 3);
}

#[test]
fn test_help_lists_every_token() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "help");

    let t = console.transcript();
    assert_eq!(t[1].content, "> help");
    assert_eq!(t[2].kind, EntryKind::Output);
    for cmd in BuiltinCommand::ALL {
        assert!(t[2].content.contains(cmd.token()), "help is missing {}", cmd.token());
    }
}

#[test]
fn test_help_mentions_every_default_clear_token() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "help");

    let help = &console.transcript()[2].content;
    for token in &ConsoleConfig::default().clear_tokens {
        assert!(help.contains(token.as_str()), "help is missing {}", token);
    }
}

#[test]
fn test_clear_alias_parses_as_cls() {
    assert_eq!(
        CommandParser::parse("clear", "CLEAR"),
        CommandType::Builtin(BuiltinCommand::Cls)
    );
    assert_eq!(BuiltinCommand::from_token("clear"), Some(BuiltinCommand::Cls));
}

#[test]
fn test_commands_are_case_insensitive() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "IPCONFIG");
    let result = console.transcript().last().unwrap();
    assert_eq!(result.kind, EntryKind::Output);
    assert!(result.content.contains("192.168.1.100"));
}

#[test]
fn test_unknown_command_is_error_entry() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "Format C:");

    let result = console.transcript().last().unwrap();
    assert_eq!(result.kind, EntryKind::Error);
    assert!(result.content.starts_with("'Format C:' is not recognized"));
}

#[test]
fn test_sequential_submissions_do_not_interleave() {
    let (mut console, clock) = console();
    for cmd in ["dir", "ipconfig", "systeminfo", "tasklist"] {
        run(&mut console, &clock, cmd);
    }
    let kinds: Vec<EntryKind> = console.transcript().iter().skip(1).map(|e| e.kind).collect();
    for pair in kinds.chunks(2) {
        assert_eq!(pair[0], EntryKind::Command);
        assert_eq!(pair[1], EntryKind::Output);
    }
    assert_eq!(kinds.len(), 8);
}

#[test]
fn test_entry_ids_strictly_increase() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "dir");
    console.clear();
    run(&mut console, &clock, "help");

    let ids: Vec<u64> = console.transcript().iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    // The banner after clear gets a fresh id, not 1 again.
    assert!(ids[0] > 3);
}

#[test]
fn test_timestamps_come_from_clock() {
    let (mut console, clock) = console();
    clock.advance_ms(42_000);
    let ticket = console.submit("dir").unwrap();
    assert_eq!(ticket.echo.timestamp, clock.now());
    assert_eq!(ticket.due, clock.now() + chrono::TimeDelta::milliseconds(1000));
}

#[test]
fn test_zero_latency_settles_on_next_tick() {
    let config = ConsoleConfig {
        latency_ms: 0,
        ..ConsoleConfig::default()
    };
    let (mut console, _) = console_with(config);
    console.submit("dir").unwrap();
    assert!(console.is_busy());
    assert!(console.tick().is_some());
    assert!(!console.is_busy());
}

// ============================================================================
// Clear token and clear()
// ============================================================================

#[test]
fn test_cls_resets_to_banner() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "dir");
    let done = run(&mut console, &clock, "cls");

    assert!(matches!(done, Completion::ScreenCleared { .. }));
    let t = console.transcript();
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].content, BANNER);
    assert!(!console.is_busy());
}

#[test]
fn test_clear_alias_and_case() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "CLEAR");
    assert_eq!(console.transcript().len(), 1);
}

#[test]
fn test_cls_echo_visible_while_pending() {
    let (mut console, _) = console();
    console.submit("cls").unwrap();
    assert_eq!(console.transcript().len(), 2);
    assert_eq!(console.transcript()[1].content, "> cls");
}

#[test]
fn test_clear_leaves_single_banner() {
    let (mut console, clock) = console();
    for cmd in ["dir", "help", "nope"] {
        run(&mut console, &clock, cmd);
    }
    assert_eq!(console.transcript().len(), 7);

    console.clear();
    assert_eq!(console.transcript().len(), 1);
    assert_eq!(console.transcript()[0].content, BANNER);

    console.clear();
    assert_eq!(console.transcript().len(), 1);
}

#[test]
fn test_clear_while_busy_keeps_command_running() {
    let (mut console, _) = console();
    console.submit("dir").unwrap();
    console.clear();
    assert_eq!(console.transcript().len(), 1);
    assert!(console.is_busy());
}

#[test]
fn test_clear_while_busy_discards_late_result() {
    let (mut console, clock) = console();
    console.submit("dir").unwrap();
    console.clear();

    clock.advance_ms(1_000);
    let done = console.tick().unwrap();
    assert_eq!(done, Completion::Discarded { seq: 1 });
    assert_eq!(console.transcript().len(), 1);
    assert!(!console.is_busy());
}

#[test]
fn test_clear_while_busy_append_policy() {
    let config = ConsoleConfig {
        late_result: LateResultPolicy::Append,
        ..ConsoleConfig::default()
    };
    let (mut console, clock) = console_with(config);
    console.submit("dir").unwrap();
    console.clear();

    clock.advance_ms(1_000);
    assert!(matches!(console.tick(), Some(Completion::Recorded { .. })));
    let t = console.transcript();
    assert_eq!(t.len(), 2);
    assert_eq!(t[0].content, BANNER);
    assert_eq!(t[1].kind, EntryKind::Output);
}

#[test]
fn test_submit_after_clear_while_busy_still_rejected() {
    let (mut console, _) = console();
    console.submit("dir").unwrap();
    console.clear();
    assert_eq!(console.submit("help"), Err(Rejected::AlreadyRunning));
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_one_line_per_entry() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "nope");

    let text = console.export_transcript();
    let lines: Vec<&str> = text.split('\n').collect();
    // banner, echo, error (single-line contents)
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(&format!("] OUTPUT: {}", BANNER)));
    assert!(lines[1].ends_with("] COMMAND: > nope"));
    assert!(lines[2].contains("] ERROR: 'nope' is not recognized"));
    assert!(lines.iter().all(|l| l.starts_with('[')));
}

#[test]
fn test_export_matches_render() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "dir");
    let expected: Vec<String> = console.transcript().iter().map(|e| e.render()).collect();
    assert_eq!(console.export_transcript(), expected.join("\n"));
}

#[test]
fn test_export_is_idempotent() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "systeminfo");
    let first = console.export_transcript();
    let second = console.export_transcript();
    assert_eq!(first, second);
    assert_eq!(console.transcript().len(), 3);
}

#[test]
fn test_export_file_name() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    assert_eq!(export_file_name(date), "terminal-log-2024-01-15.txt");
}

// ============================================================================
// Stats and pending input
// ============================================================================

#[test]
fn test_stats_follow_transcript() {
    let (mut console, clock) = console();
    run(&mut console, &clock, "dir");
    run(&mut console, &clock, "help");

    let stats = console.stats();
    assert_eq!(stats.commands_executed, 2);
    assert_eq!(stats.entries, 5);
    assert_eq!(stats.submitted_total, 2);

    console.clear();
    let stats = console.stats();
    assert_eq!(stats.commands_executed, 0);
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.submitted_total, 2);
}

#[test]
fn test_pending_input_owned_by_caller() {
    let (mut console, clock) = console();
    console.set_pending_input("ipconfig");
    let input = console.pending_input().to_string();
    run(&mut console, &clock, &input);
    assert_eq!(console.pending_input(), "ipconfig");
}

// ============================================================================
// Pluggable resolvers
// ============================================================================

#[test]
fn test_closure_resolver() {
    let clock = ManualClock::at_epoch();
    let resolver = |inv: &Invocation| -> Result<String, ResolveError> {
        if inv.normalized == "fail" {
            Err(ResolveError::new("boom"))
        } else {
            Ok(format!("echo {}", inv.literal))
        }
    };
    let mut console = CommandConsole::new(
        ConsoleConfig::default(),
        Arc::new(resolver),
        Arc::new(clock.clone()),
    );

    run(&mut console, &clock, "Hello");
    assert_eq!(console.transcript().last().unwrap().content, "echo Hello");

    run(&mut console, &clock, "FAIL");
    let last = console.transcript().last().unwrap();
    assert_eq!(last.kind, EntryKind::Error);
    assert_eq!(last.content, "boom");
}

struct ExactCase;

impl Resolver for ExactCase {
    fn normalize(&self, trimmed: &str) -> String {
        trimmed.to_string()
    }

    fn resolve(&self, invocation: &Invocation) -> Result<String, ResolveError> {
        Ok(invocation.normalized.clone())
    }
}

#[test]
fn test_resolver_controls_normalization() {
    let clock = ManualClock::at_epoch();
    let mut console = CommandConsole::new(
        ConsoleConfig::default(),
        Arc::new(ExactCase),
        Arc::new(clock.clone()),
    );
    run(&mut console, &clock, "MiXeD");
    assert_eq!(console.transcript().last().unwrap().content, "MiXeD");

    // "CLS" no longer normalizes to a clear token.
    run(&mut console, &clock, "CLS");
    assert_eq!(console.transcript().len(), 5);
}

#[test]
fn test_custom_banner_and_prompt() {
    let config = ConsoleConfig {
        banner: "ready".to_string(),
        prompt: "PS C:\\Users\\Admin> ".to_string(),
        ..ConsoleConfig::default()
    };
    let (mut console, _) = console_with(config);
    assert_eq!(console.transcript()[0].content, "ready");
    let ticket = console.submit("dir").unwrap();
    assert_eq!(ticket.echo.content, "PS C:\\Users\\Admin> dir");
}

// ============================================================================
// CommandParser Tests
// ============================================================================

#[test]
fn test_parse_builtins() {
    assert_eq!(CommandParser::parse("dir", "dir"), CommandType::Builtin(BuiltinCommand::Dir));
    assert_eq!(
        CommandParser::parse("systeminfo", "SystemInfo"),
        CommandType::Builtin(BuiltinCommand::SystemInfo)
    );
    assert_eq!(CommandParser::parse("cls", "cls"), CommandType::Builtin(BuiltinCommand::Cls));
}

#[test]
fn test_parse_unknown_keeps_literal() {
    assert_eq!(
        CommandParser::parse("dir /s", "DIR /s"),
        CommandType::Unknown("DIR /s".to_string())
    );
}

#[test]
fn test_builtin_tokens_round_trip() {
    for cmd in BuiltinCommand::ALL {
        assert_eq!(BuiltinCommand::from_token(cmd.token()), Some(cmd));
    }
    assert_eq!(BuiltinCommand::from_token("format"), None);
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_defaults_from_empty_json() {
    let config = CoreConfig::from_json_str("{}").unwrap();
    assert_eq!(config, CoreConfig::default());
    assert_eq!(config.console.latency_ms, 1000);
    assert_eq!(config.console.prompt, "> ");
    assert_eq!(config.console.late_result, LateResultPolicy::Discard);
    assert_eq!(config.notifications.default_duration_ms, 5000);
    assert_eq!(config.notifications.max_visible, None);
}

#[test]
fn test_config_partial_override() {
    let raw = r#"{
        "console": { "latency_ms": 250, "late_result": "append" },
        "notifications": { "max_visible": 3 }
    }"#;
    let config = CoreConfig::from_json_str(raw).unwrap();
    assert_eq!(config.console.latency_ms, 250);
    assert_eq!(config.console.late_result, LateResultPolicy::Append);
    assert_eq!(config.console.banner, BANNER);
    assert_eq!(config.notifications.max_visible, Some(3));
    assert_eq!(config.notifications.default_duration_ms, 5000);
}

#[test]
fn test_config_invalid_json() {
    let err = CoreConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("invalid config"));
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "console": { "banner": "hi" } }"#).unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config.console.banner, "hi");
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CoreConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));
}
