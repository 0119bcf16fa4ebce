//! codelab: a simulated Python terminal session for a code playground.
//!
//! The engine keeps an in-memory workspace, a fake package set and a shell
//! environment, turns command lines into canned output, and fabricates
//! program runs that stream line by line. See [`core::Session`].

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod web;

pub use crate::core::{Execution, ExecutionHandle, OutputSink, Session, SessionError};
pub use crate::models::{OutputLine, OutputLineData};
