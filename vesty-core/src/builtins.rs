//! Canned responses for the reference resolver.
//!
//! None of this touches the machine. The text imitates what `cmd.exe`
//! prints for each command so the dashboard console looks alive.

use crate::runtime::parser::BuiltinCommand;

/// Central dispatch for the builtin table.
pub fn dispatch(cmd: BuiltinCommand) -> String {
    match cmd {
        // ── Directory listing ──
        BuiltinCommand::Dir => [
            " Volume in drive C is Windows",
            " Directory of C:\\Users\\Admin",
            "",
            "01/15/2024  10:30 AM    <DIR>          .",
            "01/15/2024  10:30 AM    <DIR>          ..",
            "01/15/2024  10:30 AM    <DIR>          Documents",
            "01/15/2024  10:30 AM    <DIR>          Downloads",
            "               0 File(s)              0 bytes",
            "               4 Dir(s)  125,234,567,890 bytes free",
        ]
        .join("\n"),

        // ── Network configuration ──
        BuiltinCommand::Ipconfig => [
            "Windows IP Configuration",
            "",
            "Ethernet adapter Ethernet:",
            "",
            "   Connection-specific DNS Suffix  . :",
            "   IPv4 Address. . . . . . . . . . . : 192.168.1.100",
            "   Subnet Mask . . . . . . . . . . . : 255.255.255.0",
            "   Default Gateway . . . . . . . . . : 192.168.1.1",
        ]
        .join("\n"),

        // ── System info ──
        BuiltinCommand::SystemInfo => [
            "Host Name:                 VESTY-PC",
            "OS Name:                   Microsoft Windows 11 Pro",
            "OS Version:                10.0.22631 N/A Build 22631",
            "System Type:               x64-based PC",
            "Processor(s):              1 Processor(s) Installed.",
            "                          [01]: AMD64 Family 23 Model 113 Stepping 0 AuthenticAMD ~3600 Mhz",
            "Total Physical Memory:     16,384 MB",
            "Available Physical Memory: 8,192 MB",
        ]
        .join("\n"),

        // ── Process list ──
        BuiltinCommand::Tasklist => [
            "Image Name                     PID Session Name        Session#    Mem Usage",
            "========================= ======== ================ =========== ============",
            "System Idle Process              0 Services                   0          8 K",
            "System                           4 Services                   0      1,204 K",
            "explorer.exe                  6132 Console                    1    182,340 K",
            "VestyWinBox.exe               7410 Console                    1     96,112 K",
        ]
        .join("\n"),

        BuiltinCommand::Help => help_text(),

        // The console resets the screen on this token; the text only shows
        // up when a host resolves it outside the console.
        BuiltinCommand::Cls => String::new(),
    }
}

/// Lists every builtin token, aliases included, with a one-line summary.
pub fn help_text() -> String {
    let mut lines = vec!["Available commands:".to_string()];
    for cmd in BuiltinCommand::ALL {
        let names = std::iter::once(cmd.token())
            .chain(cmd.aliases().iter().copied())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  {:<12} {}", names, cmd.summary()));
    }
    lines.join("\n")
}

pub fn not_recognized(literal: &str) -> String {
    format!(
        "'{}' is not recognized as an internal or external command, operable program or batch file.",
        literal
    )
}
