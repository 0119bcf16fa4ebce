//! Paced delivery of simulated program output.
//!
//! An [`Execution`] owns the lines still to be emitted and pushes them one at
//! a time with a random delay in between. Each execution carries a shared
//! [`ExecutionHandle`]; cancelling the handle stops emission at the next
//! check and emits a single termination notice.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::{debug, info};

use super::rules::Simulation;
use crate::config::{memory_usage, stream_delays};
use crate::core::sink::OutputSink;
use crate::core::timer::Timer;
use crate::models::OutputLine;
use crate::utils::format_elapsed;

/// Line pushed when a run is stopped before it finished.
pub const TERMINATED_NOTICE: &str = "Execution terminated by user";

#[derive(Debug, Default)]
struct ExecutionState {
    cancelled: AtomicBool,
    finished: AtomicBool,
}

/// Shared view of a running (or finished) execution.
///
/// Clones refer to the same execution. Equality is by id.
#[derive(Clone, Debug)]
pub struct ExecutionHandle {
    id: u64,
    state: Arc<ExecutionState>,
}

impl ExecutionHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            state: Arc::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Request cancellation. Cancelling twice, or after the run finished,
    /// has no further effect.
    pub fn cancel(&self) {
        if self.is_finished() {
            return;
        }
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            debug!(execution = self.id, "cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::SeqCst)
    }

    /// Still emitting: neither finished nor cancelled.
    pub fn is_active(&self) -> bool {
        !self.is_finished() && !self.is_cancelled()
    }

    fn mark_finished(&self) {
        self.state.finished.store(true, Ordering::SeqCst);
    }
}

impl PartialEq for ExecutionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ExecutionHandle {}

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionOutcome {
    /// Every line was emitted.
    Completed { emitted: usize, elapsed_ms: f64 },
    /// Stopped by cancellation after `emitted` lines.
    Cancelled { emitted: usize },
}

/// A run waiting to be driven by [`Execution::run`].
#[derive(Debug)]
pub struct Execution {
    handle: ExecutionHandle,
    lines: VecDeque<String>,
}

impl Execution {
    pub fn new(id: u64, simulation: &Simulation) -> Self {
        Self {
            handle: ExecutionHandle::new(id),
            lines: simulation.lines.iter().cloned().collect(),
        }
    }

    pub fn handle(&self) -> ExecutionHandle {
        self.handle.clone()
    }

    /// Lines not yet emitted.
    pub fn pending(&self) -> usize {
        self.lines.len()
    }

    /// Emit the remaining lines into `sink`, pacing them with `timer`.
    ///
    /// Cancellation is checked before and after every wait, so no line is
    /// emitted once the handle is cancelled. A completed run ends with a
    /// summary line carrying the elapsed time and a memory figure.
    pub async fn run<T, S>(mut self, timer: &T, sink: &mut S) -> ExecutionOutcome
    where
        T: Timer,
        S: OutputSink,
    {
        let started = timer.now_ms();
        let mut emitted = 0;
        info!(execution = self.handle.id, lines = self.lines.len(), "execution started");

        while let Some(line) = self.lines.pop_front() {
            if self.handle.is_cancelled() {
                return self.terminate(sink, emitted);
            }
            timer.sleep(next_delay()).await;
            if self.handle.is_cancelled() {
                return self.terminate(sink, emitted);
            }
            sink.push(OutputLine::text(line));
            emitted += 1;
        }

        let elapsed_ms = timer.now_ms() - started;
        sink.push(OutputLine::success(format!(
            "Process finished in {} (peak memory {:.1} MB)",
            format_elapsed(elapsed_ms),
            next_memory_mb()
        )));
        self.handle.mark_finished();
        info!(execution = self.handle.id, emitted, elapsed_ms, "execution completed");
        ExecutionOutcome::Completed {
            emitted,
            elapsed_ms,
        }
    }

    fn terminate<S: OutputSink>(&self, sink: &mut S, emitted: usize) -> ExecutionOutcome {
        sink.push(OutputLine::error(TERMINATED_NOTICE));
        self.handle.mark_finished();
        info!(execution = self.handle.id, emitted, "execution cancelled");
        ExecutionOutcome::Cancelled { emitted }
    }
}

fn next_delay() -> u32 {
    rand::thread_rng().gen_range(stream_delays::MIN_MS..=stream_delays::MAX_MS)
}

fn next_memory_mb() -> f64 {
    rand::thread_rng().gen_range(memory_usage::MIN_MB..memory_usage::MAX_MB)
}
