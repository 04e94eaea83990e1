/// The closed set of commands the reference table answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    Dir,
    Ipconfig,
    SystemInfo,
    Tasklist,
    Help,
    Cls,
}

impl BuiltinCommand {
    /// Every builtin, in the order `help` lists them.
    pub const ALL: [BuiltinCommand; 6] = [
        BuiltinCommand::Dir,
        BuiltinCommand::Ipconfig,
        BuiltinCommand::SystemInfo,
        BuiltinCommand::Tasklist,
        BuiltinCommand::Cls,
        BuiltinCommand::Help,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            BuiltinCommand::Dir => "dir",
            BuiltinCommand::Ipconfig => "ipconfig",
            BuiltinCommand::SystemInfo => "systeminfo",
            BuiltinCommand::Tasklist => "tasklist",
            BuiltinCommand::Help => "help",
            BuiltinCommand::Cls => "cls",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            BuiltinCommand::Dir => "List the contents of the directory",
            BuiltinCommand::Ipconfig => "Network configuration",
            BuiltinCommand::SystemInfo => "System information",
            BuiltinCommand::Tasklist => "List running processes",
            BuiltinCommand::Help => "Show this help",
            BuiltinCommand::Cls => "Clear the screen",
        }
    }

    /// Other spellings that map to the same builtin.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            BuiltinCommand::Cls => &["clear"],
            _ => &[],
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.token() == token || cmd.aliases().contains(&token))
    }
}

#[derive(Debug, PartialEq)]
pub enum CommandType {
    Builtin(BuiltinCommand),
    /// Anything outside the table. Carries the literal input for the reply.
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    /// `normalized` is matched whole against the table; `literal` is kept
    /// for the fallback so the reply echoes what the user actually typed.
    pub fn parse(normalized: &str, literal: &str) -> CommandType {
        match BuiltinCommand::from_token(normalized.trim()) {
            Some(cmd) => CommandType::Builtin(cmd),
            None => CommandType::Unknown(literal.trim().to_string()),
        }
    }
}
