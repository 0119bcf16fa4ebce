use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::unix_now;

// =============================================================================
// File Kind
// =============================================================================

/// Category of a workspace file, derived from its name at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Source,
    Text,
    StructuredData,
    TabularData,
    Markup,
    Config,
    DependencyManifest,
}

/// File names that always describe project dependencies.
const MANIFEST_NAMES: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "pipfile",
    "setup.py",
    "package.json",
    "environment.yml",
];

impl FileKind {
    /// Detect the file kind from a file name.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if MANIFEST_NAMES.contains(&lower.as_str()) {
            return Self::DependencyManifest;
        }

        let (stem, ext) = match lower.rsplit_once('.') {
            Some((stem, ext)) => (stem, ext),
            None => (lower.as_str(), ""),
        };
        if matches!(stem, "config" | "settings") {
            return Self::Config;
        }

        match ext {
            "py" | "js" | "ts" | "rs" | "java" | "c" | "cpp" | "go" | "rb" | "sh" | "ipynb" => {
                Self::Source
            }
            "json" => Self::StructuredData,
            "csv" | "tsv" | "xlsx" | "parquet" => Self::TabularData,
            "html" | "htm" | "xml" | "md" | "svg" => Self::Markup,
            "yaml" | "yml" | "toml" | "ini" | "cfg" | "env" => Self::Config,
            _ => Self::Text,
        }
    }

    /// Short label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Text => "text",
            Self::StructuredData => "json",
            Self::TabularData => "table",
            Self::Markup => "markup",
            Self::Config => "config",
            Self::DependencyManifest => "deps",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Virtual File
// =============================================================================

/// A file held in the session's in-memory workspace.
///
/// `size` and `modified` are private so they can only change through
/// [`VirtualFile::set_content`], which keeps `size` equal to the number of
/// characters in `content`.
#[derive(Clone, Debug, Serialize)]
pub struct VirtualFile {
    name: String,
    content: String,
    kind: FileKind,
    size: u64,
    modified: u64,
    protected: bool,
}

impl VirtualFile {
    /// Create a writable file.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let content = content.into();
        Self {
            kind: FileKind::from_name(&name),
            size: char_count(&content),
            modified: unix_now(),
            protected: false,
            name,
            content,
        }
    }

    /// Create a file that rejects writes and deletes.
    pub fn protected(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            protected: true,
            ..Self::new(name, content)
        }
    }

    /// Replace the content, recomputing size and modification time.
    pub(crate) fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.size = char_count(&self.content);
        self.modified = unix_now();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Content length in characters.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time as Unix timestamp.
    pub fn modified(&self) -> u64 {
        self.modified
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Summary without content, for listings.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            kind: self.kind,
            size: self.size,
            modified: self.modified,
            protected: self.protected,
        }
    }
}

fn char_count(content: &str) -> u64 {
    content.chars().count() as u64
}

/// Listing entry for a workspace file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    pub kind: FileKind,
    pub size: u64,
    pub modified: u64,
    pub protected: bool,
}
