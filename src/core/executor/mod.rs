//! Execution streamer.
//!
//! [`simulate`] turns source text into fabricated output with an ordered
//! rule table; [`Execution`] delivers that output line by line over a
//! [`Timer`](crate::core::timer::Timer) until it completes or is cancelled.

mod rules;
mod stream;

pub use rules::{Artifact, FALLBACK_OUTPUT, RULES, Rule, Simulation, simulate};
pub use stream::{Execution, ExecutionHandle, ExecutionOutcome, TERMINATED_NOTICE};
