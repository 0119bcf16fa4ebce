//! Tab completion for command lines.
//!
//! Completes the last word of the input:
//! - Command names (e.g., "py" → "py", "python", "python3")
//! - Workspace file names for commands that take files (`cat`, `python`, `rm`, ...)
//! - Directory names for `cd` and `rmdir`
//! - `pip` subcommands, and installed package names after `pip show|uninstall`
//!
//! A single match completes the whole line; several matches extend the line
//! to their common prefix and report the candidates.

use crate::core::commands::Command;
use crate::core::filesystem::VirtualFs;
use crate::core::packages::PackageRegistry;

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single match: the completed input line.
    Single(String),
    /// Multiple matches: (input extended to the common prefix, candidates).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

/// Commands whose operands are workspace files.
const FILE_COMMANDS: &[&str] = &[
    "cat", "type", "python", "python3", "py", "rm", "del", "touch",
];

/// Commands whose operands are directories.
const DIR_COMMANDS: &[&str] = &["cd", "rmdir"];

const PIP_SUBCOMMANDS: &[&str] = &["freeze", "install", "list", "show", "uninstall"];

/// Complete `input` against the command table and the session state.
pub fn autocomplete(input: &str, fs: &VirtualFs, packages: &PackageRegistry) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    let words: Vec<&str> = input.split_whitespace().collect();
    // Trailing space means a new, empty word is being completed.
    let (done, partial) = if input.ends_with(char::is_whitespace) {
        (words.as_slice(), "")
    } else {
        let (last, done) = words.split_last().map_or((input, &[][..]), |(l, d)| (*l, d));
        (done, last)
    };

    let candidates = candidates_for(done, fs, packages);
    let matches: Vec<String> = candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&partial.to_lowercase()))
        .collect();

    let prefix = if done.is_empty() {
        String::new()
    } else {
        format!("{} ", done.join(" "))
    };

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{}{} ", prefix, matches[0])),
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(format!("{}{}", prefix, common), matches)
        }
    }
}

/// Possible values for the word following `done`.
fn candidates_for(done: &[&str], fs: &VirtualFs, packages: &PackageRegistry) -> Vec<String> {
    let Some(cmd) = done.first().map(|c| c.to_lowercase()) else {
        return Command::names().iter().map(|s| s.to_string()).collect();
    };

    if matches!(cmd.as_str(), "pip" | "pip3") {
        return match done.get(1).copied() {
            None => PIP_SUBCOMMANDS.iter().map(|s| s.to_string()).collect(),
            Some("show" | "uninstall") => {
                packages.list().iter().map(|p| p.name.clone()).collect()
            }
            Some("install") if done.last() == Some(&"-r") => {
                fs.names().map(str::to_string).collect()
            }
            Some(_) => Vec::new(),
        };
    }
    if FILE_COMMANDS.contains(&cmd.as_str()) {
        return fs.names().map(str::to_string).collect();
    }
    if DIR_COMMANDS.contains(&cmd.as_str()) {
        return fs.directories().to_vec();
    }
    Vec::new()
}

/// Find the common prefix of multiple strings (case-insensitive).
fn find_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut prefix_len = first.chars().count();
    for s in rest {
        prefix_len = first
            .chars()
            .zip(s.chars())
            .take(prefix_len)
            .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
            .count();
    }

    first.chars().take(prefix_len).collect()
}

// ============================================================================
// Tests
// ============================================================================
