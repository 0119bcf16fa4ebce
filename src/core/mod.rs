//! Core engine of the simulated terminal session.
//!
//! This module provides:
//! - [`VirtualFs`] the in-memory workspace and [`PackageRegistry`]
//! - [`Command`] parsing and [`execute_pipeline`] execution
//! - [`simulate`] and [`Execution`] for fabricated program output
//! - [`Session`] tying them together behind one API
//! - [`autocomplete`] for tab completion

mod autocomplete;
pub mod commands;
pub mod env;
pub mod error;
pub mod executor;
mod filesystem;
mod history;
mod packages;
pub mod parser;
mod session;
mod sink;
pub mod timer;

pub use autocomplete::{AutocompleteResult, autocomplete};
pub use commands::{Command, CommandResult, Effect, ShellContext, execute_pipeline};
pub use env::SessionEnv;
pub use error::{Result, SessionError};
pub use executor::{Execution, ExecutionHandle, ExecutionOutcome, Simulation, simulate};
pub use filesystem::VirtualFs;
pub use history::CommandHistory;
pub use packages::{PackageRegistry, resolve_package};
pub use parser::parse_input;
pub use session::Session;
pub use sink::{OutputSink, Scrollback};
pub use timer::{InstantTimer, Timer};

#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;

#[cfg(target_arch = "wasm32")]
pub use timer::BrowserTimer;
