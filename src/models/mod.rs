//! Data models and types for the session engine.
//!
//! Contains domain types for:
//! - [`VirtualFile`], [`FileSummary`], [`FileKind`] - Workspace file representation
//! - [`InstalledPackage`] - Simulated package metadata
//! - [`OutputLine`] - Terminal output types

mod filesystem;
mod package;
mod terminal;

pub use filesystem::{FileKind, FileSummary, VirtualFile};
pub use package::{InstalledPackage, parse_requirement};
pub use terminal::{OutputLine, OutputLineData};
