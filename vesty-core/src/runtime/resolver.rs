use crate::builtins;
use crate::runtime::parser::{CommandParser, CommandType};
use thiserror::Error;

/// One command handed to a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The input as typed, trimmed.
    pub literal: String,
    /// The input after the resolver's normalization policy.
    pub normalized: String,
}

/// A resolver's failure text. Recorded as an `error` entry, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResolveError {
    pub message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Stands in for real command execution.
///
/// Implementations must be pure: the console calls `resolve` once per
/// accepted command and only looks at the returned text.
pub trait Resolver: Send + Sync {
    /// Normalization policy applied before matching. Lowercase by default.
    fn normalize(&self, trimmed: &str) -> String {
        trimmed.to_lowercase()
    }

    fn resolve(&self, invocation: &Invocation) -> Result<String, ResolveError>;
}

impl<F> Resolver for F
where
    F: Fn(&Invocation) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, invocation: &Invocation) -> Result<String, ResolveError> {
        self(invocation)
    }
}

/// The reference table: a handful of canned Windows-style answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResolver;

impl CannedResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for CannedResolver {
    fn resolve(&self, invocation: &Invocation) -> Result<String, ResolveError> {
        match CommandParser::parse(&invocation.normalized, &invocation.literal) {
            CommandType::Builtin(cmd) => Ok(builtins::dispatch(cmd)),
            CommandType::Unknown(literal) => Err(ResolveError::new(builtins::not_recognized(&literal))),
        }
    }
}
