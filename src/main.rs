//! `codelab` command line: an interactive session on the terminal.
//!
//! Lines typed at the prompt go through [`Session::submit_command`].
//! `:run <file>` streams a program run with realistic pacing; Ctrl-C stops it.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::error::Error;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use codelab::core::{InstantTimer, Timer, TokioTimer};
    use codelab::{Execution, OutputLine, OutputLineData, OutputSink, Session};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tracing::{debug, info};
    use tracing_subscriber::EnvFilter;

    /// Simulated Python terminal session
    #[derive(Parser, Debug)]
    #[command(name = "codelab", version, about, long_about = None)]
    pub struct Cli {
        /// Run a command line and exit (repeatable)
        #[arg(short = 'c', long = "command", value_name = "LINE")]
        commands: Vec<String>,

        /// Copy a local file into the workspace before starting (repeatable)
        #[arg(long = "upload", value_name = "PATH")]
        uploads: Vec<PathBuf>,

        /// Stream program output without delays
        #[arg(long)]
        fast: bool,

        /// Log filter such as `debug` or `codelab=trace` (overrides RUST_LOG)
        #[arg(long, value_name = "FILTER")]
        log_level: Option<String>,
    }

    /// Writes session output to stdout.
    struct TerminalSink {
        /// Print command echo lines (off in the REPL, where the user already
        /// sees what they typed)
        echo: bool,
    }

    impl OutputSink for TerminalSink {
        fn push(&mut self, line: OutputLine) {
            match &line.data {
                OutputLineData::Command { .. } if !self.echo => {}
                OutputLineData::Error(msg) => eprintln!("{}", msg),
                _ => println!("{}", line),
            }
        }

        fn clear(&mut self) {
            print!("\x1b[2J\x1b[H");
            let _ = std::io::stdout().flush();
        }
    }

    fn init_tracing(filter: Option<&str>) {
        let filter = match filter {
            Some(f) => EnvFilter::new(f),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    fn upload(session: &mut Session, path: &Path) -> Result<(), Box<dyn Error>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("invalid upload path: {}", path.display()))?;
        let content = std::fs::read_to_string(path)?;
        session.upload_file(name, &content)?;
        Ok(())
    }

    /// Drive an execution, cancelling it on Ctrl-C.
    async fn stream<T: Timer>(execution: Execution, timer: &T, sink: &mut TerminalSink) {
        let handle = execution.handle();
        let interrupt = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
            // The run notices the cancellation and finishes on its own.
            std::future::pending::<()>().await
        };

        tokio::select! {
            outcome = execution.run(timer, sink) => debug!(?outcome, "stream ended"),
            _ = interrupt => {}
        }
    }

    /// Handle one input line. Returns `false` when the session should end.
    async fn handle_line(
        session: &mut Session,
        line: &str,
        fast: bool,
        sink: &mut TerminalSink,
    ) -> bool {
        let trimmed = line.trim();
        match trimmed.split_once(char::is_whitespace) {
            _ if matches!(trimmed, "exit" | "quit" | ":q") => return false,
            Some((":run", file)) => match session.execute_file(file.trim()) {
                Ok(execution) if fast => stream(execution, &InstantTimer::new(), sink).await,
                Ok(execution) => stream(execution, &TokioTimer::new(), sink).await,
                Err(e) => sink.push(OutputLine::error(e.to_string())),
            },
            _ => session.submit_command(line, sink),
        }
        true
    }

    pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
        init_tracing(cli.log_level.as_deref());

        let mut session = Session::new();
        for path in &cli.uploads {
            upload(&mut session, path)?;
        }

        if !cli.commands.is_empty() {
            let mut sink = TerminalSink { echo: true };
            for line in &cli.commands {
                if !handle_line(&mut session, line, cli.fast, &mut sink).await {
                    break;
                }
            }
            return Ok(());
        }

        info!("starting interactive session");
        let mut sink = TerminalSink { echo: false };
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{}$ ", session.prompt());
            std::io::stdout().flush()?;

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        println!();
                        break;
                    };
                    if !handle_line(&mut session, &line, cli.fast, &mut sink).await {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => println!("^C"),
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    use clap::Parser;

    match cli::run(cli::Cli::parse()).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("codelab: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// The browser build is driven through the library's bindings.
#[cfg(target_arch = "wasm32")]
fn main() {}
