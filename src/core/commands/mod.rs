//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed terminal commands
//! - `CommandResult` for command output and requested [`Effect`]s
//! - `execute_pipeline` for executing commands with pipe support
//!
//! # Architecture
//!
//! Commands are parsed from user input into the `Command` enum, then
//! executed via `execute_command` against a read-only [`ShellContext`].
//! Execution never mutates the session: state changes come back as effects
//! that the session applies afterwards. Pipes are handled by
//! `execute_pipeline`, which applies filter commands (grep, head, tail, wc).

mod execute;
mod filters;
mod result;

pub use execute::execute_command;
pub use filters::apply_filter;
pub use result::{CommandResult, Effect};

use std::fmt;

use tracing::debug;

use crate::core::env::SessionEnv;
use crate::core::filesystem::VirtualFs;
use crate::core::packages::PackageRegistry;
use crate::core::parser::Pipeline;

// =============================================================================
// Execution Context
// =============================================================================

/// Read-only view of the session handed to command execution.
#[derive(Clone, Copy)]
pub struct ShellContext<'a> {
    pub fs: &'a VirtualFs,
    pub packages: &'a PackageRegistry,
    pub env: &'a SessionEnv,
    /// Submitted lines, including the one being executed.
    pub history: &'a [String],
}

// =============================================================================
// Path Argument Type
// =============================================================================

/// A file or directory name passed to a command (e.g., `cat main.py`).
///
/// Stored as-is; existence is checked during execution against the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Command Enum
// =============================================================================

/// `pip` subcommands
#[derive(Clone, Debug, PartialEq)]
pub enum PipCommand {
    /// Requirement specifiers plus an optional `-r` requirements file
    Install {
        specs: Vec<String>,
        requirements: Option<PathArg>,
    },
    Uninstall(Vec<String>),
    List {
        json: bool,
    },
    Show(Vec<String>),
    Freeze,
    Version,
}

/// Parsed terminal command
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Pip(PipCommand),
    /// Run a workspace file
    Python(PathArg),
    /// Run inline source (`python -c`)
    PythonInline(String),
    PythonVersion,
    Cat(PathArg),
    Ls,
    Clear,
    /// `env`, or `printenv NAME` for a single variable
    Env(Option<String>),
    Which(String),
    Export(Option<String>),
    Unset(String),
    Cd(PathArg),
    Pwd,
    Touch(Vec<PathArg>),
    Mkdir(Vec<PathArg>),
    Rm(Vec<PathArg>),
    Rmdir(Vec<PathArg>),
    Echo(String),
    Help,
    History,
    /// A known command invoked incorrectly; carries the message to print
    Usage(String),
    Unknown(String),
}

impl Command {
    /// Get all available command names for autocomplete.
    ///
    /// Includes both regular commands and pipe filter commands.
    pub fn names() -> &'static [&'static str] {
        &[
            "cat", "cd", "clear", "cls", "del", "dir", "echo", "env", "export", "grep", "head",
            "help", "history", "ls", "mkdir", "pip", "pip3", "printenv", "pwd", "py", "python",
            "python3", "rm", "rmdir", "set", "tail", "touch", "type", "unset", "wc", "which",
        ]
    }

    /// Parse command from name and arguments.
    pub fn parse(name: &str, args: &[String]) -> Self {
        let lower = name.to_lowercase();
        let cmd = match lower.as_str() {
            "pip" | "pip3" => parse_pip(args),
            "python" | "python3" | "py" => parse_python(args),
            "cat" | "type" => match args.first() {
                Some(file) => Self::Cat(PathArg::new(file)),
                None => Self::Usage(format!("{}: missing file operand", lower)),
            },
            "ls" | "dir" => Self::Ls,
            "clear" | "cls" => Self::Clear,
            "env" | "set" => Self::Env(None),
            "printenv" => Self::Env(args.first().cloned()),
            "which" => match args.first() {
                Some(tool) => Self::Which(tool.clone()),
                None => Self::Usage("which: missing argument".to_string()),
            },
            "export" => {
                if args.is_empty() {
                    Self::Export(None)
                } else {
                    Self::Export(Some(args.join(" ")))
                }
            }
            "unset" => match args.first() {
                Some(key) => Self::Unset(key.clone()),
                None => Self::Usage("unset: missing variable name".to_string()),
            },
            "cd" => Self::Cd(
                args.first()
                    .map(PathArg::new)
                    .unwrap_or_else(|| PathArg::new("~")),
            ),
            "pwd" => Self::Pwd,
            "touch" => operands(&lower, args).map_or_else(Self::Usage, Self::Touch),
            "mkdir" => operands(&lower, args).map_or_else(Self::Usage, Self::Mkdir),
            "rm" | "del" => operands(&lower, args).map_or_else(Self::Usage, Self::Rm),
            "rmdir" => operands(&lower, args).map_or_else(Self::Usage, Self::Rmdir),
            "echo" => Self::Echo(args.join(" ")),
            "help" | "?" => Self::Help,
            "history" => Self::History,
            _ => Self::Unknown(name.to_string()),
        };
        debug!(command = name, parsed = ?cmd, "parsed command");
        cmd
    }
}

/// Collect non-flag operands, or the usage error when there are none.
fn operands(name: &str, args: &[String]) -> Result<Vec<PathArg>, String> {
    let paths: Vec<PathArg> = args
        .iter()
        .filter(|a| !a.starts_with('-'))
        .map(PathArg::new)
        .collect();
    if paths.is_empty() {
        Err(format!("{}: missing operand", name))
    } else {
        Ok(paths)
    }
}

fn parse_pip(args: &[String]) -> Command {
    let Some((sub, rest)) = args.split_first() else {
        return Command::Usage("Usage: pip <command> [options]".to_string());
    };

    let pip = match sub.as_str() {
        "install" => {
            let mut specs = Vec::new();
            let mut requirements = None;
            let mut iter = rest.iter();
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "-r" | "--requirement" => requirements = iter.next().map(PathArg::new),
                    flag if flag.starts_with('-') => {}
                    spec => specs.push(spec.to_string()),
                }
            }
            if specs.is_empty() && requirements.is_none() {
                return Command::Usage(
                    "ERROR: You must give at least one requirement to install".to_string(),
                );
            }
            PipCommand::Install {
                specs,
                requirements,
            }
        }
        "uninstall" => {
            let names: Vec<String> = rest.iter().filter(|a| !a.starts_with('-')).cloned().collect();
            if names.is_empty() {
                return Command::Usage(
                    "ERROR: You must give at least one requirement to uninstall".to_string(),
                );
            }
            PipCommand::Uninstall(names)
        }
        "list" => PipCommand::List {
            json: rest.iter().any(|a| a == "--format=json"),
        },
        "show" => {
            if rest.is_empty() {
                return Command::Usage(
                    "ERROR: Please provide a package name or names.".to_string(),
                );
            }
            PipCommand::Show(rest.to_vec())
        }
        "freeze" => PipCommand::Freeze,
        "--version" | "-V" => PipCommand::Version,
        other => return Command::Usage(format!("ERROR: unknown command \"{}\"", other)),
    };
    Command::Pip(pip)
}

fn parse_python(args: &[String]) -> Command {
    match args.first().map(String::as_str) {
        None => Command::Usage(
            "Interactive mode is not available here. Usage: python <file>".to_string(),
        ),
        Some("--version" | "-V") => Command::PythonVersion,
        Some("-m") => match args.get(1).map(String::as_str) {
            Some("pip") => parse_pip(&args[2..]),
            Some(module) => Command::Usage(format!("No module named {}", module)),
            None => Command::Usage("Argument expected for the -m option".to_string()),
        },
        Some("-c") => match args.get(1) {
            Some(code) => Command::PythonInline(code.clone()),
            None => Command::Usage("Argument expected for the -c option".to_string()),
        },
        Some(file) => Command::Python(PathArg::new(file)),
    }
}

// =============================================================================
// Pipeline Execution
// =============================================================================

/// Execute a pipeline of commands with pipe filtering.
///
/// A pipeline consists of a main command followed by optional filter commands
/// separated by `|`. For example: `pip list | grep num | head -5`.
/// Effects of the main command are kept when its output is piped.
pub fn execute_pipeline(pipeline: &Pipeline, ctx: &ShellContext<'_>) -> CommandResult {
    // Check for syntax errors first
    if let Some(ref err) = pipeline.error {
        return CommandResult::error(err.to_string());
    }

    let Some((first, filters)) = pipeline.commands.split_first() else {
        return CommandResult::empty();
    };

    let cmd = Command::parse(&first.name, &first.args);
    let mut result = execute_command(cmd, ctx);

    for filter_cmd in filters {
        result.output = apply_filter(&filter_cmd.name, &filter_cmd.args, result.output);
    }
    result
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_pip_install() {
        assert_eq!(
            Command::parse("pip", &args(&["install", "-q", "requests", "flask==2.3.2"])),
            Command::Pip(PipCommand::Install {
                specs: args(&["requests", "flask==2.3.2"]),
                requirements: None,
            })
        );
        assert!(matches!(
            Command::parse("pip", &args(&["install", "-r", "requirements.txt"])),
            Command::Pip(PipCommand::Install { ref specs, requirements: Some(ref r) })
                if specs.is_empty() && *r == "requirements.txt"
        ));
        assert!(matches!(
            Command::parse("pip", &args(&["install"])),
            Command::Usage(_)
        ));
    }

    #[test]
    fn test_parse_pip_subcommands() {
        assert_eq!(
            Command::parse("pip3", &args(&["list", "--format=json"])),
            Command::Pip(PipCommand::List { json: true })
        );
        assert_eq!(
            Command::parse("pip", &args(&["freeze"])),
            Command::Pip(PipCommand::Freeze)
        );
        assert_eq!(
            Command::parse("pip", &args(&["--version"])),
            Command::Pip(PipCommand::Version)
        );
        assert_eq!(
            Command::parse("pip", &args(&["uninstall", "-y", "numpy"])),
            Command::Pip(PipCommand::Uninstall(args(&["numpy"])))
        );
        assert!(matches!(Command::parse("pip", &[]), Command::Usage(_)));
        assert!(matches!(
            Command::parse("pip", &args(&["frobnicate"])),
            Command::Usage(ref m) if m.contains("frobnicate")
        ));
    }

    #[test]
    fn test_parse_python() {
        assert!(matches!(
            Command::parse("python", &args(&["main.py"])),
            Command::Python(ref f) if *f == "main.py"
        ));
        assert_eq!(
            Command::parse("python3", &args(&["--version"])),
            Command::PythonVersion
        );
        assert_eq!(
            Command::parse("py", &args(&["-m", "pip", "freeze"])),
            Command::Pip(PipCommand::Freeze)
        );
        assert_eq!(
            Command::parse("python", &args(&["-c", "print('hi')"])),
            Command::PythonInline("print('hi')".to_string())
        );
        assert!(matches!(Command::parse("python", &[]), Command::Usage(_)));
    }

    #[test]
    fn test_parse_file_commands() {
        assert!(matches!(
            Command::parse("type", &args(&["data.csv"])),
            Command::Cat(ref f) if *f == "data.csv"
        ));
        assert!(matches!(Command::parse("cat", &[]), Command::Usage(_)));
        assert_eq!(
            Command::parse("del", &args(&["-f", "a.py", "b.py"])),
            Command::Rm(vec![PathArg::new("a.py"), PathArg::new("b.py")])
        );
        assert!(matches!(
            Command::parse("touch", &[]),
            Command::Usage(ref m) if m == "touch: missing operand"
        ));
    }

    #[test]
    fn test_parse_environment_commands() {
        assert_eq!(Command::parse("set", &[]), Command::Env(None));
        assert_eq!(
            Command::parse("printenv", &args(&["HOME"])),
            Command::Env(Some("HOME".to_string()))
        );
        assert_eq!(
            Command::parse("export", &args(&["FOO=bar"])),
            Command::Export(Some("FOO=bar".to_string()))
        );
        assert!(matches!(Command::parse("unset", &[]), Command::Usage(_)));
        assert!(matches!(
            Command::parse("cd", &[]),
            Command::Cd(ref p) if *p == "~"
        ));
    }

    #[test]
    fn test_parse_case_insensitive_and_aliases() {
        assert_eq!(Command::parse("LS", &[]), Command::Ls);
        assert_eq!(Command::parse("DIR", &[]), Command::Ls);
        assert_eq!(Command::parse("CleAr", &[]), Command::Clear);
        assert_eq!(Command::parse("cls", &[]), Command::Clear);
        assert_eq!(Command::parse("?", &[]), Command::Help);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            Command::parse("foobar", &[]),
            Command::Unknown(ref c) if c == "foobar"
        ));
    }

    #[test]
    fn test_command_names() {
        let names = Command::names();
        for expected in ["pip", "python", "ls", "cat", "touch", "rm", "which", "history"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        // Filter commands are included for autocomplete
        for filter in ["grep", "head", "tail", "wc"] {
            assert!(names.contains(&filter));
        }
        let mut sorted = names.to_vec();
        sorted.sort();
        assert_eq!(sorted, names);
    }
}
