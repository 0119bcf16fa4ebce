//! Session controller.
//!
//! A [`Session`] owns the workspace, the package set, the shell environment,
//! the command history and the handle of the one execution allowed to run at
//! a time. Command lines are dispatched through the pure interpreter and the
//! effects it requests are applied here.

use tracing::{debug, info, warn};

use crate::config::{APP_NAME, HOME_DIR, PROMPT_USER, VENV_LABEL};
use crate::core::autocomplete::{AutocompleteResult, autocomplete};
use crate::core::commands::{Effect, ShellContext, execute_pipeline};
use crate::core::env::SessionEnv;
use crate::core::error::Result;
use crate::core::executor::{Execution, ExecutionHandle, simulate};
use crate::core::filesystem::VirtualFs;
use crate::core::history::CommandHistory;
use crate::core::packages::PackageRegistry;
use crate::core::parser::parse_input;
use crate::core::sink::OutputSink;
use crate::models::{FileSummary, InstalledPackage, OutputLine};

/// One user's simulated terminal session.
#[derive(Debug)]
pub struct Session {
    fs: VirtualFs,
    packages: PackageRegistry,
    env: SessionEnv,
    history: CommandHistory,
    running: Option<ExecutionHandle>,
    next_execution_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a session with the seeded workspace and starter packages.
    pub fn new() -> Self {
        Self::with_workspace(VirtualFs::seeded())
    }

    /// Start a session over an existing workspace.
    pub fn with_workspace(fs: VirtualFs) -> Self {
        Self {
            fs,
            packages: PackageRegistry::seeded(),
            env: SessionEnv::activated(),
            history: CommandHistory::new(),
            running: None,
            next_execution_id: 0,
        }
    }

    // =========================================================================
    // Command line
    // =========================================================================

    /// Prompt shown before input, e.g. `(venv) student@codelab:~/project`.
    pub fn prompt(&self) -> String {
        let dir = self.env.current_dir();
        let display = match dir.strip_prefix(HOME_DIR) {
            Some("") => "~".to_string(),
            Some(rest) if rest.starts_with('/') => format!("~{}", rest),
            _ => dir.to_string(),
        };
        let venv = if self.env.environment_active() {
            format!("{} ", VENV_LABEL)
        } else {
            String::new()
        };
        format!("{}{}@{}:{}", venv, PROMPT_USER, APP_NAME, display)
    }

    /// Run one command line, writing its echo and output to `sink`.
    ///
    /// The raw line is appended to history before anything else happens.
    /// Failures never escape: they are rendered as error lines.
    pub fn submit_command<S: OutputSink>(&mut self, raw: &str, sink: &mut S) {
        let prompt = self.prompt();
        self.history.push(raw);
        sink.push(OutputLine::command(prompt, raw));

        let pipeline = parse_input(raw, self.history.before_last(), &self.env);
        let result = execute_pipeline(
            &pipeline,
            &ShellContext {
                fs: &self.fs,
                packages: &self.packages,
                env: &self.env,
                history: self.history.entries(),
            },
        );
        debug!(
            command = pipeline.first_command_name().unwrap_or_default(),
            lines = result.output.len(),
            effects = result.effects.len(),
            "command executed"
        );

        let mut output = result.output;
        for effect in result.effects {
            if let Err(e) = self.apply_effect(effect, sink) {
                warn!(error = %e, "effect rejected");
                output.push(OutputLine::error(e.to_string()));
            }
        }
        sink.extend(output);
    }

    fn apply_effect<S: OutputSink>(&mut self, effect: Effect, sink: &mut S) -> Result<()> {
        match effect {
            Effect::ClearScreen => sink.clear(),
            Effect::ChangeDirectory(path) => self.env.change_dir(&path),
            Effect::TouchFile(name) => {
                if !self.fs.exists(&name) {
                    self.fs.create(&name, "")?;
                }
            }
            Effect::WriteFile { name, content } => self.fs.upsert(&name, &content)?,
            Effect::DeleteFile(name) => self.fs.delete(&name)?,
            Effect::CreateDirectory(name) => self.fs.mkdir(&name)?,
            Effect::RemoveDirectory(name) => self.fs.rmdir(&name)?,
            Effect::Install(package) => self.packages.install(package),
            Effect::Uninstall(name) => {
                self.packages.uninstall(&name)?;
            }
            Effect::SetVar { key, value } => self.env.set(&key, &value)?,
            Effect::UnsetVar(key) => self.env.unset(&key),
        }
        Ok(())
    }

    /// Step back through history. Stops at the oldest entry.
    pub fn recall_previous(&mut self) -> Option<String> {
        self.history.older()
    }

    /// Step forward through history. `None` once past the newest entry.
    pub fn recall_next(&mut self) -> Option<String> {
        self.history.newer()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Tab-complete a partial command line.
    pub fn complete(&self, input: &str) -> AutocompleteResult {
        autocomplete(input, &self.fs, &self.packages)
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Prepare a streamed run of a workspace file.
    ///
    /// Fails with `NotFound` when the file does not exist; in that case the
    /// current execution, if any, keeps running.
    pub fn execute_file(&mut self, name: &str) -> Result<Execution> {
        let source = self.fs.read(name)?.to_string();
        Ok(self.execute_source(&source))
    }

    /// Prepare a streamed run of `source`, cancelling the running one.
    ///
    /// Files the program writes are stored right away.
    pub fn execute_source(&mut self, source: &str) -> Execution {
        let mut sim = simulate(source);
        for artifact in &sim.artifacts {
            if let Err(e) = self.fs.upsert(&artifact.name, &artifact.content) {
                sim.lines.push(format!("PermissionError: {}", e));
            }
        }

        if let Some(previous) = self.running.take() {
            previous.cancel();
        }
        self.next_execution_id += 1;
        let execution = Execution::new(self.next_execution_id, &sim);
        info!(
            execution = self.next_execution_id,
            rules = ?sim.fired,
            "execution prepared"
        );
        self.running = Some(execution.handle());
        execution
    }

    /// Cancel an execution. Safe to call repeatedly or after it finished.
    pub fn cancel_execution(&mut self, handle: &ExecutionHandle) {
        handle.cancel();
        if self.running.as_ref() == Some(handle) {
            self.running = None;
        }
    }

    /// Cancel the running execution if it has the given id.
    ///
    /// Returns whether anything was cancelled. Ids of finished or replaced
    /// executions are ignored.
    pub fn cancel_execution_by_id(&mut self, id: u64) -> bool {
        match self.running_execution().filter(|h| h.id() == id).cloned() {
            Some(handle) => {
                self.cancel_execution(&handle);
                true
            }
            None => false,
        }
    }

    /// The execution still emitting output, if any.
    pub fn running_execution(&self) -> Option<&ExecutionHandle> {
        self.running.as_ref().filter(|h| h.is_active())
    }

    // =========================================================================
    // Workspace
    // =========================================================================

    pub fn list_files(&self) -> Vec<FileSummary> {
        self.fs.list()
    }

    pub fn read_file(&self, name: &str) -> Result<&str> {
        self.fs.read(name)
    }

    /// Create an empty file.
    pub fn new_file(&mut self, name: &str) -> Result<FileSummary> {
        self.fs.create(name, "").map(|f| f.summary())
    }

    /// Overwrite an existing file from the editor.
    pub fn save_file(&mut self, name: &str, content: &str) -> Result<()> {
        self.fs.write(name, content)
    }

    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        self.fs.delete(name)
    }

    /// Store a file provided by the user, replacing any file of that name.
    pub fn upload_file(&mut self, name: &str, content: &str) -> Result<()> {
        self.fs.upsert(name, content)?;
        info!(file = name, chars = content.chars().count(), "file uploaded");
        Ok(())
    }

    /// Content of a file for export.
    pub fn download_file(&self, name: &str) -> Result<String> {
        self.fs.read(name).map(str::to_string)
    }

    pub fn workspace(&self) -> &VirtualFs {
        &self.fs
    }

    pub fn packages(&self) -> &[InstalledPackage] {
        self.packages.list()
    }

    pub fn env(&self) -> &SessionEnv {
        &self.env
    }
}
