//! Session environment: working directory, virtual environment flag and
//! environment variables.
//!
//! Variables live in memory for the lifetime of the session. The built-in
//! ones describe the simulated toolchain; users add their own with
//! `export` and remove them with `unset`.

use std::collections::BTreeMap;

use crate::config::{HOME_DIR, PIP_VERSION, PYTHON_VERSION, PROMPT_USER, START_DIR, VENV_PATH};
use crate::core::error::{Result, SessionError};

/// Check if a variable name is valid.
///
/// Valid names must:
/// - Not be empty
/// - Start with a letter or underscore
/// - Contain only alphanumeric characters and underscores
pub fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Mutable shell state of a session.
#[derive(Clone, Debug)]
pub struct SessionEnv {
    current_dir: String,
    environment_active: bool,
    vars: BTreeMap<String, String>,
}

impl SessionEnv {
    /// Environment at session start: virtual environment activated,
    /// working directory at the project root.
    pub fn activated() -> Self {
        let vars = [
            ("HOME", HOME_DIR),
            ("USER", PROMPT_USER),
            ("VIRTUAL_ENV", VENV_PATH),
            ("PYTHON_VERSION", PYTHON_VERSION),
            ("PIP_VERSION", PIP_VERSION),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            current_dir: START_DIR.to_string(),
            environment_active: true,
            vars,
        }
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Change directory. Paths are opaque; `~` expands to the home directory
    /// and relative paths are appended to the current one.
    pub fn change_dir(&mut self, path: &str) {
        self.current_dir = resolve_dir(&self.current_dir, path);
    }

    pub fn environment_active(&self) -> bool {
        self.environment_active
    }

    /// Look up a variable.
    ///
    /// `PWD` always follows the working directory. `PATH` is derived from
    /// the virtual environment unless the user exported their own.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "PWD" => Some(self.current_dir.clone()),
            "PATH" => Some(self.vars.get(key).cloned().unwrap_or_else(|| self.path_var())),
            _ => self.vars.get(key).cloned(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !is_valid_var_name(key) {
            return Err(SessionError::InvalidOperation(
                "invalid variable name (use letters, numbers, underscores)".to_string(),
            ));
        }
        if key == "PWD" {
            return Err(SessionError::InvalidOperation(
                "PWD is read-only (use cd to change directory)".to_string(),
            ));
        }
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a variable. Removing an unknown name succeeds silently.
    pub fn unset(&mut self, key: &str) {
        self.vars.remove(key);
    }

    /// All variables sorted by name, including derived ones.
    pub fn all(&self) -> Vec<(String, String)> {
        let mut all: Vec<(String, String)> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.vars.contains_key("PATH") {
            all.push(("PATH".to_string(), self.path_var()));
        }
        all.push(("PWD".to_string(), self.current_dir.clone()));
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    fn path_var(&self) -> String {
        if self.environment_active {
            format!("{}/bin:/usr/local/bin:/usr/bin:/bin", VENV_PATH)
        } else {
            "/usr/local/bin:/usr/bin:/bin".to_string()
        }
    }
}

/// Resolve a `cd` argument against the current directory.
fn resolve_dir(current: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path == "~" {
        return HOME_DIR.to_string();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return normalize(&format!("{}/{}", HOME_DIR, rest));
    }
    if path.starts_with('/') {
        return normalize(path);
    }
    normalize(&format!("{}/{}", current, path))
}

/// Collapse `.` and `..` segments and duplicate slashes.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}
