//! Command execution logic.
//!
//! Contains the `execute_command` function that runs parsed commands
//! against a read-only session snapshot and returns output plus effects.

use serde::Serialize;

use crate::config::{HELP_TEXT, PIP_VERSION, PYTHON_VERSION, VENV_PATH};
use crate::core::error::SessionError;
use crate::core::executor::simulate;
use crate::core::packages::resolve_package;
use crate::models::{InstalledPackage, OutputLine, parse_requirement};
use crate::utils::thousands;

use super::{Command, CommandResult, Effect, PathArg, PipCommand, ShellContext};

/// Execute a parsed command.
///
/// Nothing is mutated here: state changes are returned as [`Effect`]s, which
/// are validated against `ctx` so a well-formed effect normally applies.
pub fn execute_command(cmd: Command, ctx: &ShellContext<'_>) -> CommandResult {
    match cmd {
        Command::Pip(pip) => execute_pip(pip, ctx),
        Command::Python(file) => execute_python(&file, ctx),
        Command::PythonInline(code) => run_source(&code),
        Command::PythonVersion => {
            CommandResult::output(vec![OutputLine::text(format!("Python {}", PYTHON_VERSION))])
        }
        Command::Cat(file) => execute_cat(&file, ctx),
        Command::Ls => execute_ls(ctx),
        Command::Clear => CommandResult::empty().with_effect(Effect::ClearScreen),
        Command::Env(None) => CommandResult::output(
            ctx.env
                .all()
                .into_iter()
                .map(|(k, v)| OutputLine::text(format!("{}={}", k, v)))
                .collect(),
        ),
        Command::Env(Some(key)) => match ctx.env.get(&key) {
            Some(value) => CommandResult::output(vec![OutputLine::text(value)]),
            None => CommandResult::empty(),
        },
        Command::Which(tool) => execute_which(&tool, ctx),
        Command::Export(arg) => execute_export(arg, ctx),
        Command::Unset(key) => CommandResult::empty().with_effect(Effect::UnsetVar(key)),
        Command::Cd(path) => {
            CommandResult::empty().with_effect(Effect::ChangeDirectory(path.as_str().to_string()))
        }
        Command::Pwd => CommandResult::output(vec![OutputLine::text(ctx.env.current_dir())]),
        Command::Touch(paths) => execute_touch(paths, ctx),
        Command::Mkdir(paths) => execute_mkdir(paths, ctx),
        Command::Rm(paths) => execute_rm(paths, ctx),
        Command::Rmdir(paths) => execute_rmdir(paths, ctx),
        Command::Echo(text) => CommandResult::output(vec![OutputLine::text(text)]),
        Command::Help => CommandResult::output(HELP_TEXT.lines().map(OutputLine::text).collect()),
        Command::History => CommandResult::output(
            ctx.history
                .iter()
                .enumerate()
                .map(|(i, line)| OutputLine::text(format!("{:>5}  {}", i, line)))
                .collect(),
        ),
        Command::Usage(message) => CommandResult::error(message),
        Command::Unknown(name) => {
            CommandResult::error(SessionError::UnrecognizedCommand(name).to_string())
        }
    }
}

/// `site-packages` directory inside the virtual environment.
fn site_packages() -> String {
    let short = PYTHON_VERSION
        .rsplit_once('.')
        .map(|(major_minor, _)| major_minor)
        .unwrap_or(PYTHON_VERSION);
    format!("{}/lib/python{}/site-packages", VENV_PATH, short)
}

// =============================================================================
// pip
// =============================================================================

fn execute_pip(cmd: PipCommand, ctx: &ShellContext<'_>) -> CommandResult {
    match cmd {
        PipCommand::Install {
            specs,
            requirements,
        } => execute_pip_install(specs, requirements, ctx),
        PipCommand::Uninstall(names) => execute_pip_uninstall(names, ctx),
        PipCommand::List { json } => execute_pip_list(json, ctx),
        PipCommand::Show(names) => execute_pip_show(names, ctx),
        PipCommand::Freeze => CommandResult::output(
            ctx.packages
                .list()
                .iter()
                .map(|p| OutputLine::text(p.requirement()))
                .collect(),
        ),
        PipCommand::Version => CommandResult::output(vec![OutputLine::text(format!(
            "pip {} from {}/pip (python {})",
            PIP_VERSION,
            site_packages(),
            PYTHON_VERSION
        ))]),
    }
}

fn execute_pip_install(
    mut specs: Vec<String>,
    requirements: Option<PathArg>,
    ctx: &ShellContext<'_>,
) -> CommandResult {
    if let Some(file) = requirements {
        match ctx.fs.read(file.as_str()) {
            Ok(content) => specs.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_string),
            ),
            Err(_) => {
                return CommandResult::error(format!(
                    "ERROR: Could not open requirements file: [Errno 2] No such file or directory: '{}'",
                    file
                ));
            }
        }
    }

    let mut result = CommandResult::empty();
    let mut installed: Vec<InstalledPackage> = Vec::new();

    for spec in &specs {
        let (name, version) = parse_requirement(spec);
        if name.is_empty() || installed.iter().any(|p| p.name == name) {
            continue;
        }
        if let Some(existing) = ctx.packages.get(&name)
            && version.as_deref().is_none_or(|v| v == existing.version)
        {
            result.output.push(OutputLine::text(format!(
                "Requirement already satisfied: {} in {} ({})",
                name,
                site_packages(),
                existing.version
            )));
            continue;
        }

        let package = resolve_package(&name, version.as_deref());
        result.output.push(OutputLine::text(format!("Collecting {}", spec)));
        result.output.push(OutputLine::text(format!(
            "  Downloading {}-{}-py3-none-any.whl ({} kB)",
            package.name.replace('-', "_"),
            package.version,
            download_size_kb(&package.name)
        )));
        installed.push(package);
    }

    if installed.is_empty() {
        return result;
    }

    let names: Vec<&str> = installed.iter().map(|p| p.name.as_str()).collect();
    result.output.push(OutputLine::text(format!(
        "Installing collected packages: {}",
        names.join(", ")
    )));
    let pinned: Vec<String> = installed
        .iter()
        .map(|p| format!("{}-{}", p.name, p.version))
        .collect();
    result.output.push(OutputLine::success(format!(
        "Successfully installed {}",
        pinned.join(" ")
    )));
    result
        .effects
        .extend(installed.into_iter().map(Effect::Install));
    result
}

/// Fabricated wheel size, stable per package name.
fn download_size_kb(name: &str) -> u64 {
    let seed: u64 = name.bytes().map(u64::from).sum();
    100 + (seed * 37) % 1900
}

fn execute_pip_uninstall(names: Vec<String>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut result = CommandResult::empty();
    for raw in names {
        let (name, _) = parse_requirement(&raw);
        match ctx.packages.get(&name) {
            Some(pkg) => {
                result.output.push(OutputLine::text(format!(
                    "Found existing installation: {} {}",
                    pkg.name, pkg.version
                )));
                result.output.push(OutputLine::success(format!(
                    "  Successfully uninstalled {}-{}",
                    pkg.name, pkg.version
                )));
                result.effects.push(Effect::Uninstall(name));
            }
            None => result.output.push(OutputLine::info(format!(
                "WARNING: Skipping {} as it is not installed.",
                name
            ))),
        }
    }
    result
}

#[derive(Serialize)]
struct ListedPackage<'a> {
    name: &'a str,
    version: &'a str,
}

fn execute_pip_list(json: bool, ctx: &ShellContext<'_>) -> CommandResult {
    let packages = ctx.packages.list();

    if json {
        let listed: Vec<ListedPackage<'_>> = packages
            .iter()
            .map(|p| ListedPackage {
                name: &p.name,
                version: &p.version,
            })
            .collect();
        return match serde_json::to_string(&listed) {
            Ok(text) => CommandResult::output(vec![OutputLine::text(text)]),
            Err(e) => CommandResult::error(format!("ERROR: {}", e)),
        };
    }

    let name_width = packages
        .iter()
        .map(|p| p.name.len())
        .chain(std::iter::once("Package".len()))
        .max()
        .unwrap_or_default();
    let version_width = packages
        .iter()
        .map(|p| p.version.len())
        .chain(std::iter::once("Version".len()))
        .max()
        .unwrap_or_default();

    let mut lines = vec![
        OutputLine::text(format!("{:<name_width$} {}", "Package", "Version")),
        OutputLine::text(format!(
            "{} {}",
            "-".repeat(name_width),
            "-".repeat(version_width)
        )),
    ];
    lines.extend(
        packages
            .iter()
            .map(|p| OutputLine::text(format!("{:<name_width$} {}", p.name, p.version))),
    );
    CommandResult::output(lines)
}

fn execute_pip_show(names: Vec<String>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut lines = Vec::new();
    let mut missing = Vec::new();

    for raw in &names {
        let (name, _) = parse_requirement(raw);
        let Some(pkg) = ctx.packages.get(&name) else {
            missing.push(name);
            continue;
        };
        if !lines.is_empty() {
            lines.push(OutputLine::text("---"));
        }
        lines.push(OutputLine::text(format!("Name: {}", pkg.name)));
        lines.push(OutputLine::text(format!("Version: {}", pkg.version)));
        lines.push(OutputLine::text(format!("Summary: {}", pkg.description)));
        lines.push(OutputLine::text(format!("Location: {}", site_packages())));
        lines.push(OutputLine::text("Requires: "));
    }

    if !missing.is_empty() {
        lines.push(OutputLine::info(format!(
            "WARNING: Package(s) not found: {}",
            missing.join(", ")
        )));
    }
    CommandResult::output(lines)
}

// =============================================================================
// python
// =============================================================================

fn execute_python(file: &PathArg, ctx: &ShellContext<'_>) -> CommandResult {
    match ctx.fs.read(file.as_str()) {
        Ok(source) => run_source(source),
        Err(_) => CommandResult::error(format!(
            "python: can't open file '{}/{}': [Errno 2] No such file or directory",
            ctx.env.current_dir(),
            file
        )),
    }
}

/// Simulate `source` in one shot; generated files become write effects.
fn run_source(source: &str) -> CommandResult {
    let sim = simulate(source);
    CommandResult {
        output: sim.lines.into_iter().map(OutputLine::text).collect(),
        effects: sim
            .artifacts
            .into_iter()
            .map(|a| Effect::WriteFile {
                name: a.name,
                content: a.content,
            })
            .collect(),
    }
}

// =============================================================================
// Files
// =============================================================================

fn execute_cat(file: &PathArg, ctx: &ShellContext<'_>) -> CommandResult {
    if ctx.fs.has_directory(file.as_str()) {
        return CommandResult::error(format!("cat: {}: Is a directory", file));
    }
    match ctx.fs.read(file.as_str()) {
        Ok(content) => CommandResult::output(content.lines().map(OutputLine::text).collect()),
        Err(_) => CommandResult::error(format!("cat: {}: No such file or directory", file)),
    }
}

fn execute_ls(ctx: &ShellContext<'_>) -> CommandResult {
    let mut lines: Vec<OutputLine> = ctx
        .fs
        .directories()
        .iter()
        .map(OutputLine::dir_entry)
        .collect();
    lines.extend(ctx.fs.list().iter().map(OutputLine::file_entry));

    let count = ctx.fs.len();
    lines.push(OutputLine::info(format!(
        "{} file{}, {} characters",
        count,
        if count == 1 { "" } else { "s" },
        thousands(ctx.fs.total_size())
    )));
    CommandResult::output(lines)
}

fn execute_touch(paths: Vec<PathArg>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut result = CommandResult::empty();
    for path in paths {
        let name = path.as_str();
        if ctx.fs.has_directory(name) || ctx.fs.exists(name) {
            continue;
        }
        result.effects.push(Effect::TouchFile(name.to_string()));
    }
    result
}

fn execute_mkdir(paths: Vec<PathArg>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut result = CommandResult::empty();
    for path in paths {
        let name = path.as_str();
        if ctx.fs.has_directory(name) || ctx.fs.exists(name) {
            result.output.push(OutputLine::error(format!(
                "mkdir: cannot create directory '{}': File exists",
                name
            )));
        } else {
            result.effects.push(Effect::CreateDirectory(name.to_string()));
        }
    }
    result
}

fn execute_rm(paths: Vec<PathArg>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut result = CommandResult::empty();
    for path in paths {
        let name = path.as_str();
        if ctx.fs.has_directory(name) {
            result
                .output
                .push(OutputLine::error(format!("rm: cannot remove '{}': Is a directory", name)));
        } else if !ctx.fs.exists(name) {
            result.output.push(OutputLine::error(format!(
                "rm: cannot remove '{}': No such file or directory",
                name
            )));
        } else if let Err(e) = ctx.fs.check_delete(name) {
            result
                .output
                .push(OutputLine::error(format!("rm: cannot remove '{}': {}", name, e)));
        } else {
            result.effects.push(Effect::DeleteFile(name.to_string()));
        }
    }
    result
}

fn execute_rmdir(paths: Vec<PathArg>, ctx: &ShellContext<'_>) -> CommandResult {
    let mut result = CommandResult::empty();
    for path in paths {
        let name = path.as_str();
        if ctx.fs.has_directory(name) {
            result.effects.push(Effect::RemoveDirectory(name.to_string()));
        } else if ctx.fs.exists(name) {
            result.output.push(OutputLine::error(format!(
                "rmdir: failed to remove '{}': Not a directory",
                name
            )));
        } else {
            result.output.push(OutputLine::error(format!(
                "rmdir: failed to remove '{}': No such file or directory",
                name
            )));
        }
    }
    result
}

// =============================================================================
// Environment
// =============================================================================

/// Tools that resolve inside the virtual environment while it is active.
const VENV_TOOLS: &[&str] = &["python", "python3", "py", "pip", "pip3"];

fn execute_which(tool: &str, ctx: &ShellContext<'_>) -> CommandResult {
    if VENV_TOOLS.contains(&tool) && ctx.env.environment_active() {
        return CommandResult::output(vec![OutputLine::text(format!("{}/bin/{}", VENV_PATH, tool))]);
    }
    if Command::names().contains(&tool) {
        return CommandResult::output(vec![OutputLine::text(format!("/usr/bin/{}", tool))]);
    }
    CommandResult::error(format!(
        "which: no {} in ({})",
        tool,
        ctx.env.get("PATH").unwrap_or_default()
    ))
}

fn execute_export(arg: Option<String>, ctx: &ShellContext<'_>) -> CommandResult {
    let Some(assignment) = arg else {
        // No argument: show all variables
        return CommandResult::output(
            ctx.env
                .all()
                .into_iter()
                .map(|(k, v)| OutputLine::text(format!("declare -x {}=\"{}\"", k, v)))
                .collect(),
        );
    };

    match assignment.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if !crate::core::env::is_valid_var_name(key) {
                return CommandResult::error(format!("export: '{}': not a valid identifier", key));
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            CommandResult::empty().with_effect(Effect::SetVar {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
        // Just a key without value - show current value
        None => {
            let key = assignment.trim();
            match ctx.env.get(key) {
                Some(value) => {
                    CommandResult::output(vec![OutputLine::text(format!("{}={}", key, value))])
                }
                None => CommandResult::empty(),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
