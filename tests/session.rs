//! End-to-end behavior of a session driven through its public API.

use codelab::core::executor::{FALLBACK_OUTPUT, TERMINATED_NOTICE};
use codelab::core::{ExecutionOutcome, InstantTimer, Scrollback, VirtualFs};
use codelab::{OutputLine, OutputLineData, Session, SessionError};

fn submit(session: &mut Session, line: &str) -> Vec<OutputLine> {
    let mut out = Vec::new();
    session.submit_command(line, &mut out);
    out
}

fn plain(lines: &[OutputLine]) -> Vec<String> {
    lines.iter().map(OutputLine::plain).collect()
}

fn single_file_session() -> Session {
    let mut fs = VirtualFs::empty();
    fs.create("a.py", "print('a')").unwrap();
    Session::with_workspace(fs)
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_history_grows_by_one_per_submission() {
    let mut session = Session::new();
    let lines = ["ls", "", "   ", "not-a-command", "ls | | wc", "pip list | grep num", "!!"];
    for (i, line) in lines.iter().enumerate() {
        let out = submit(&mut session, line);
        assert_eq!(session.history().len(), i + 1);
        assert_eq!(session.history().last().map(String::as_str), Some(*line));
        // The echo of the submitted line comes before any output.
        assert!(matches!(
            &out[0].data,
            OutputLineData::Command { input, .. } if input == line
        ));
    }
}

#[test]
fn test_recall_on_empty_history() {
    let mut session = Session::new();
    assert_eq!(session.recall_previous(), None);
    assert_eq!(session.recall_next(), None);
    submit(&mut session, "pwd");
    assert_eq!(session.recall_previous().as_deref(), Some("pwd"));
}

#[test]
fn test_recall_stays_in_bounds() {
    let mut session = Session::new();
    for line in ["ls", "pwd", "env"] {
        submit(&mut session, line);
    }

    let mut seen = Vec::new();
    for _ in 0..10 {
        seen.push(session.recall_previous().expect("history is not empty"));
    }
    assert_eq!(&seen[..3], &["env", "pwd", "ls"]);
    assert!(seen[3..].iter().all(|l| l == "ls"));

    assert_eq!(session.recall_next().as_deref(), Some("pwd"));
    assert_eq!(session.recall_next().as_deref(), Some("env"));
    assert_eq!(session.recall_next(), None);
    assert_eq!(session.recall_next(), None);
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_pip_install_requests() {
    let mut session = Session::new();
    assert!(!session.packages().iter().any(|p| p.name == "requests"));

    let out = plain(&submit(&mut session, "pip install requests"));

    let pkg = session
        .packages()
        .iter()
        .find(|p| p.name == "requests")
        .expect("requests installed");
    assert!(pkg.installed);
    assert!(out.iter().any(|l| l.contains("Successfully installed requests")));

    let listed = plain(&submit(&mut session, "pip list | grep requests"));
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_pip_uninstall_then_show() {
    let mut session = Session::new();
    submit(&mut session, "pip uninstall -y pandas");
    assert!(!session.packages().iter().any(|p| p.name == "pandas"));
    let out = plain(&submit(&mut session, "pip show pandas"));
    assert!(out.iter().any(|l| l.contains("not found: pandas")));
}

#[test]
fn test_python_missing_file_changes_only_history() {
    let mut session = Session::new();
    let files_before = session.list_files();
    let packages_before = session.packages().to_vec();
    let dir_before = session.env().current_dir().to_string();

    let out = submit(&mut session, "python missing.py");

    assert!(matches!(
        &out[1].data,
        OutputLineData::Error(msg) if msg.contains("No such file or directory")
    ));
    assert_eq!(session.list_files(), files_before);
    assert_eq!(session.packages(), packages_before.as_slice());
    assert_eq!(session.env().current_dir(), dir_before);
    assert_eq!(session.history(), &["python missing.py".to_string()]);
    assert!(session.running_execution().is_none());
}

#[test]
fn test_unknown_command_message() {
    let mut session = Session::new();
    let out = plain(&submit(&mut session, "frobnicate --now"));
    assert_eq!(
        out[1],
        SessionError::UnrecognizedCommand("frobnicate".to_string()).to_string()
    );
}

#[test]
fn test_ls_reports_count_and_total() {
    let mut session = Session::new();
    submit(&mut session, "mkdir notebooks");
    let out = plain(&submit(&mut session, "dir"));
    assert!(out[1].contains("<DIR>") && out[1].ends_with("notebooks"));
    let summary = out.last().unwrap();
    assert!(summary.starts_with(&format!("{} files, ", session.list_files().len())));
    assert!(summary.ends_with(" characters"));
}

#[test]
fn test_pipes_keep_side_effects() {
    let mut session = Session::new();
    let out = plain(&submit(&mut session, "python -c \"df.to_csv('out.csv')\" | wc -l"));
    assert_eq!(out[1], "1");
    assert!(session.workspace().exists("out.csv"));
}

#[test]
fn test_variables_and_directories() {
    let mut session = Session::new();
    submit(&mut session, "export DATA_DIR=datasets");
    let out = plain(&submit(&mut session, "echo \"dir=$DATA_DIR\""));
    assert_eq!(out[1], "dir=datasets");

    submit(&mut session, "cd $DATA_DIR");
    assert_eq!(session.env().current_dir(), "/home/student/project/datasets");
    let out = plain(&submit(&mut session, "pwd"));
    assert_eq!(out[1], "/home/student/project/datasets");
}

#[test]
fn test_variable_joined_with_path_suffix() {
    let mut session = Session::new();
    submit(&mut session, "cd $HOME/project/src");
    assert_eq!(session.env().current_dir(), "/home/student/project/src");

    let out = plain(&submit(&mut session, "echo $HOME/x"));
    assert_eq!(out[1], "/home/student/x");
}

#[test]
fn test_exported_path_listed_once() {
    let mut session = Session::new();
    submit(&mut session, "export PATH=/opt/bin");
    let out = plain(&submit(&mut session, "env | grep PATH="));
    assert_eq!(out[1..], ["PATH=/opt/bin".to_string()]);
}

#[test]
fn test_clear_through_scrollback() {
    let mut session = Session::new();
    let mut screen = Scrollback::new();
    session.submit_command("help", &mut screen);
    assert!(screen.len() > 1);
    session.submit_command("cls", &mut screen);
    assert!(screen.is_empty());
}

// =============================================================================
// Workspace
// =============================================================================

#[test]
fn test_sole_file_cannot_be_deleted() {
    let mut session = single_file_session();

    assert!(matches!(
        session.delete_file("a.py"),
        Err(SessionError::InvalidOperation(_))
    ));
    let out = submit(&mut session, "rm a.py");
    assert!(matches!(&out[1].data, OutputLineData::Error(_)));
    assert_eq!(session.list_files().len(), 1);
    assert!(session.read_file("a.py").is_ok());
}

#[test]
fn test_protected_file_rejects_every_mutation() {
    let mut session = Session::new();
    let original = session.read_file("config.json").unwrap().to_string();

    for content in ["", "{}", "x".repeat(4096).as_str(), "ünïcödé"] {
        assert_eq!(
            session.save_file("config.json", content),
            Err(SessionError::ProtectedFile("config.json".to_string()))
        );
        assert!(session.upload_file("config.json", content).is_err());
    }
    assert_eq!(
        session.delete_file("config.json"),
        Err(SessionError::ProtectedFile("config.json".to_string()))
    );
    submit(&mut session, "rm config.json");

    assert_eq!(session.read_file("config.json").unwrap(), original);
}

#[test]
fn test_size_tracks_content_after_writes() {
    let mut session = Session::new();
    for content in ["", "print('hi')\n", "# ünïcödé\n", "y".repeat(10_000).as_str()] {
        session.save_file("main.py", content).unwrap();
        let summary = session
            .list_files()
            .into_iter()
            .find(|f| f.name == "main.py")
            .unwrap();
        assert_eq!(summary.size, content.chars().count() as u64);
    }

    session.upload_file("fresh.txt", "abc").unwrap();
    let fresh = session.workspace().get("fresh.txt").unwrap();
    assert_eq!(fresh.size(), fresh.content().chars().count() as u64);
}

#[test]
fn test_upload_and_download_roundtrip() {
    let mut session = Session::new();
    session.upload_file("notes.md", "# Notes\n").unwrap();
    assert_eq!(session.download_file("notes.md").unwrap(), "# Notes\n");
    assert!(matches!(
        session.download_file("ghost.md"),
        Err(SessionError::NotFound { .. })
    ));
}

// =============================================================================
// Execution
// =============================================================================

async fn run_to_end(session: &mut Session, source: &str) -> (ExecutionOutcome, Vec<String>) {
    let execution = session.execute_source(source);
    let mut out: Vec<OutputLine> = Vec::new();
    let outcome = execution.run(&InstantTimer::new(), &mut out).await;
    (outcome, plain(&out))
}

#[tokio::test]
async fn test_accelerator_source_streams_status_block() {
    let mut session = Session::new();
    let (outcome, out) = run_to_end(&mut session, "device = torch.device('cuda')").await;

    assert!(matches!(outcome, ExecutionOutcome::Completed { .. }));
    assert!(out.contains(&"GPU available: True".to_string()));
    assert!(out.last().unwrap().starts_with("Process finished in"));
    assert!(session.running_execution().is_none());
}

#[tokio::test]
async fn test_unrecognized_source_is_exact_fallback() {
    let mut session = Session::new();
    let (_, out) = run_to_end(&mut session, "x = 41 + 1").await;
    assert_eq!(out[0], FALLBACK_OUTPUT);
    assert_eq!(out.len(), 2);

    let one_shot = submit(&mut session, "python -c \"x = 41 + 1\"");
    assert_eq!(plain(&one_shot[1..]), vec![FALLBACK_OUTPUT.to_string()]);
}

#[tokio::test]
async fn test_restart_leaves_exactly_one_active() {
    let mut session = Session::new();
    let first = session.execute_file("main.py").unwrap();
    let first_handle = first.handle();
    let second = session.execute_source("print('again')");
    let second_handle = second.handle();

    assert!(first_handle.is_cancelled());
    assert!(second_handle.is_active());
    assert_eq!(session.running_execution(), Some(&second_handle));

    let mut out: Vec<OutputLine> = Vec::new();
    let outcome = first.run(&InstantTimer::new(), &mut out).await;
    assert_eq!(outcome, ExecutionOutcome::Cancelled { emitted: 0 });
    assert_eq!(plain(&out), vec![TERMINATED_NOTICE.to_string()]);
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let mut session = Session::new();
    let execution = session.execute_file("main.py").unwrap();
    let handle = execution.handle();

    session.cancel_execution(&handle);
    session.cancel_execution(&handle);
    assert!(session.running_execution().is_none());

    let mut out: Vec<OutputLine> = Vec::new();
    execution.run(&InstantTimer::new(), &mut out).await;
    let notices = out
        .iter()
        .filter(|l| l.plain() == TERMINATED_NOTICE)
        .count();
    assert_eq!(notices, 1);

    // Finished and cancelled: still a no-op
    session.cancel_execution(&handle);
    assert!(handle.is_finished());
}

#[tokio::test]
async fn test_cancel_after_completion_is_noop() {
    let mut session = Session::new();
    let (_, _) = run_to_end(&mut session, "print('done')").await;
    let finished = session.execute_source("print('next')");
    let handle = finished.handle();
    let mut out: Vec<OutputLine> = Vec::new();
    finished.run(&InstantTimer::new(), &mut out).await;

    session.cancel_execution(&handle);
    assert!(!handle.is_cancelled());
    assert!(session.running_execution().is_none());
}
