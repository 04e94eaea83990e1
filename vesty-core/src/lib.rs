pub mod builtins;
pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod notifications;
pub mod runtime;
pub mod timer;

// Re-export the main struct so hosts can just use `vesty_core::VestyEngine`
pub use engine::{EngineEvent, VestyEngine};

// Re-export the types every page touches
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ConsoleConfig, CoreConfig, LateResultPolicy, NotificationConfig};
pub use console::{
    export_file_name, CommandConsole, Completion, ConsoleStats, EntryKind, LogEntry, Rejected,
    Ticket,
};
pub use notifications::{
    Notification, NotificationCenter, NotificationEvent, NotificationId, NotificationKind,
    RemovalReason,
};
pub use runtime::resolver::{CannedResolver, Invocation, ResolveError, Resolver};
