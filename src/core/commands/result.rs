//! Command execution result type.

use crate::models::{InstalledPackage, OutputLine};

/// A state change requested by a command.
///
/// Commands never mutate the session directly; the session applies effects
/// in order after the command returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Empty the terminal (`clear`)
    ClearScreen,
    ChangeDirectory(String),
    /// Create an empty file if missing (`touch`)
    TouchFile(String),
    /// Create or overwrite a file (files written by a program run)
    WriteFile { name: String, content: String },
    DeleteFile(String),
    CreateDirectory(String),
    RemoveDirectory(String),
    Install(InstalledPackage),
    Uninstall(String),
    SetVar { key: String, value: String },
    UnsetVar(String),
}

/// Result of executing a command.
///
/// Commands produce output and optionally request state changes.
#[derive(Clone, Debug, Default)]
pub struct CommandResult {
    /// Output lines to display
    pub output: Vec<OutputLine>,
    /// State changes to apply, in order
    pub effects: Vec<Effect>,
}

impl CommandResult {
    /// Create a result with just output, no effects.
    pub fn output(lines: Vec<OutputLine>) -> Self {
        Self {
            output: lines,
            effects: vec![],
        }
    }

    /// Create a result carrying a single error line.
    pub fn error(message: impl Into<String>) -> Self {
        Self::output(vec![OutputLine::error(message)])
    }

    /// Create an empty result (no output, no effects).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}
