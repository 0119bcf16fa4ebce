//! Destinations for terminal output.

use std::collections::VecDeque;

use crate::config::MAX_TERMINAL_HISTORY;
use crate::models::OutputLine;

/// Receives output lines as a session produces them.
///
/// Implementors render or store lines; `clear` empties whatever the user
/// sees (the `clear` command).
pub trait OutputSink {
    fn push(&mut self, line: OutputLine);

    fn clear(&mut self);

    fn extend(&mut self, lines: impl IntoIterator<Item = OutputLine>)
    where
        Self: Sized,
    {
        for line in lines {
            self.push(line);
        }
    }
}

impl OutputSink for Vec<OutputLine> {
    fn push(&mut self, line: OutputLine) {
        Vec::push(self, line);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn push(&mut self, line: OutputLine) {
        (**self).push(line);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

// =============================================================================
// Scrollback
// =============================================================================

/// Bounded terminal buffer. Once full, the oldest lines are dropped.
#[derive(Clone, Debug)]
pub struct Scrollback {
    lines: VecDeque<OutputLine>,
    capacity: usize,
}

impl Scrollback {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TERMINAL_HISTORY)
    }

    /// A zero capacity is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Plain text of every buffered line.
    pub fn render(&self) -> Vec<String> {
        self.lines.iter().map(OutputLine::plain).collect()
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for Scrollback {
    fn push(&mut self, line: OutputLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}
