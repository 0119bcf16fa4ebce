//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the engine.
//! Text assets are loaded at compile time using `include_str!`.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/text/help.txt");

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the prompt.
pub const APP_NAME: &str = "codelab";

/// User name displayed in the prompt.
pub const PROMPT_USER: &str = "student";

/// Prompt prefix shown while the virtual environment is active.
pub const VENV_LABEL: &str = "(venv)";

/// Home directory of the session user.
pub const HOME_DIR: &str = "/home/student";

/// Working directory at session start.
pub const START_DIR: &str = "/home/student/project";

// =============================================================================
// Simulated Toolchain Versions
// =============================================================================

/// Interpreter version reported by `python --version`.
pub const PYTHON_VERSION: &str = "3.11.5";

/// Package manager version reported by `pip --version`.
pub const PIP_VERSION: &str = "23.2.1";

/// Location of the virtual environment.
pub const VENV_PATH: &str = "/home/student/project/venv";

// =============================================================================
// Workspace Seed
// =============================================================================

/// Name of the protected configuration file.
pub const CONFIG_FILE: &str = "config.json";

/// Files present in every new session, in listing order.
pub const SEED_FILES: &[(&str, &str)] = &[
    ("main.py", include_str!("../assets/text/main.py")),
    ("data.csv", include_str!("../assets/text/data.csv")),
    (
        "requirements.txt",
        include_str!("../assets/text/requirements.txt"),
    ),
];

/// Content of the protected configuration file.
pub const CONFIG_CONTENT: &str = include_str!("../assets/text/config.json");

/// Packages installed in every new session: (name, version, description).
pub const STARTER_PACKAGES: &[(&str, &str, &str)] = &[
    ("numpy", "1.24.3", "Fundamental package for array computing"),
    ("pandas", "2.0.3", "Powerful data structures for data analysis"),
    ("matplotlib", "3.7.2", "Python plotting package"),
    ("scikit-learn", "1.3.0", "Machine learning library"),
];

/// Descriptions for well-known packages installed during a session.
pub const KNOWN_PACKAGES: &[(&str, &str)] = &[
    ("requests", "HTTP library for humans"),
    ("torch", "Tensors and dynamic neural networks"),
    ("tensorflow", "Open source machine learning framework"),
    ("flask", "A simple framework for building web applications"),
    ("django", "High-level web framework"),
    ("seaborn", "Statistical data visualization"),
    ("scipy", "Scientific library for Python"),
];

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of output lines kept by [`crate::core::Scrollback`].
pub const MAX_TERMINAL_HISTORY: usize = 1000;

/// Pipe filter defaults.
pub mod pipe_filters {
    /// Default number of lines for `head` command.
    pub const DEFAULT_HEAD_LINES: usize = 10;
    /// Default number of lines for `tail` command.
    pub const DEFAULT_TAIL_LINES: usize = 10;
}

// =============================================================================
// Execution Streaming
// =============================================================================

/// Streaming delay bounds between emitted lines (milliseconds).
pub mod stream_delays {
    /// Shortest pause between two lines.
    pub const MIN_MS: u32 = 150;
    /// Longest pause between two lines.
    pub const MAX_MS: u32 = 500;
}

/// Bounds of the fabricated memory usage figure (megabytes).
pub mod memory_usage {
    pub const MIN_MB: f64 = 24.0;
    pub const MAX_MB: f64 = 96.0;
}

// =============================================================================
// Time Constants
// =============================================================================

/// Milliseconds per second for time formatting.
pub const MS_PER_SECOND: f64 = 1000.0;
