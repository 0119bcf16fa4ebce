//! Output lines produced by commands and program runs.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use super::{FileKind, FileSummary};
use crate::utils::{format_date_short, format_size};

/// One line of session output.
///
/// Front ends key list rendering on `id`; equality ignores it.
#[derive(Clone, Debug, Serialize)]
pub struct OutputLine {
    pub id: usize,
    pub data: OutputLineData,
}

/// What a line shows and how it is styled.
///
/// Serializes as `{ "type": ..., "value": ... }` for the browser bindings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OutputLineData {
    /// Echo of a submitted line
    Command { prompt: String, input: String },
    Text(String),
    Error(String),
    Success(String),
    /// Secondary notes such as pip warnings and listing totals
    Info(String),
    Empty,
    /// Workspace listing entry (ls, dir). `kind` is `None` for directories.
    ListEntry {
        name: String,
        kind: Option<FileKind>,
        size: Option<u64>,
        modified: Option<u64>,
        protected: bool,
    },
}

static OUTPUT_LINE_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl OutputLine {
    fn new(data: OutputLineData) -> Self {
        Self {
            id: OUTPUT_LINE_COUNTER.fetch_add(1, Ordering::Relaxed),
            data,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Text(s.into()))
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Error(s.into()))
    }

    pub fn success(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Success(s.into()))
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Info(s.into()))
    }

    pub fn command(prompt: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OutputLineData::Command {
            prompt: prompt.into(),
            input: input.into(),
        })
    }

    /// Create a listing entry for a workspace file
    pub fn file_entry(file: &FileSummary) -> Self {
        Self::new(OutputLineData::ListEntry {
            name: file.name.clone(),
            kind: Some(file.kind),
            size: Some(file.size),
            modified: Some(file.modified),
            protected: file.protected,
        })
    }

    /// Create a listing entry for a directory
    pub fn dir_entry(name: impl Into<String>) -> Self {
        Self::new(OutputLineData::ListEntry {
            name: name.into(),
            kind: None,
            size: None,
            modified: None,
            protected: false,
        })
    }

    /// Blank spacer line
    pub fn empty() -> Self {
        Self::new(OutputLineData::Empty)
    }

    /// The line's text as rendered on a plain terminal.
    pub fn plain(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for OutputLine {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            OutputLineData::Command { prompt, input } => write!(f, "{}$ {}", prompt, input),
            OutputLineData::Text(s)
            | OutputLineData::Error(s)
            | OutputLineData::Success(s)
            | OutputLineData::Info(s) => f.write_str(s),
            OutputLineData::Empty => Ok(()),
            OutputLineData::ListEntry {
                name,
                kind,
                size,
                modified,
                protected,
            } => {
                let label = match kind {
                    Some(kind) => kind.label(),
                    None => "<DIR>",
                };
                let lock = if *protected { " (read-only)" } else { "" };
                write!(
                    f,
                    "{}  {:>6}  {:<6}  {}{}",
                    format_date_short(*modified),
                    format_size(*size, true),
                    label,
                    name,
                    lock
                )
            }
        }
    }
}
