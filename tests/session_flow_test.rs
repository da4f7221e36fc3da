use std::{fs, io::Cursor, path::Path, time::Duration};

use anyhow::Result;
use hardenctl::{
    Coordinator, Level, ModuleDescriptor, ProcessRunner, Registry, Session, Shell, Status, StatusSink,
};
use tempfile::TempDir;

#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
}

impl StatusSink for Transcript {
    fn status(&mut self, level: Level, message: &str) {
        self.lines.push(format!("{level:?}: {message}"));
    }

    fn heading(&mut self, title: &str) {
        self.lines.push(title.to_string());
    }

    fn plain(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn prompt(&mut self, question: &str) {
        self.lines.push(question.to_string());
    }
}

fn write_scripts(dir: &Path) -> Result<Registry> {
    fs::write(dir.join("echo.sh"), "echo \"checked ($1)\"\nexit 0\n")?;
    fs::write(dir.join("exit2.sh"), "echo \"found issues ($1)\"\necho 'sshd: PermitRootLogin yes' >&2\nexit 2\n")?;
    Ok(Registry::new(vec![
        ModuleDescriptor::new("1", "Echo Success", "echo.sh"),
        ModuleDescriptor::new("2", "Exit Two", "exit2.sh"),
    ])?)
}

async fn run_shell(input: &str) -> Result<(TempDir, Session, Transcript)> {
    let dir = TempDir::new()?;
    let registry = write_scripts(dir.path())?;
    let runner = ProcessRunner::new(Duration::from_secs(10)).with_interpreter("sh");
    let coordinator = Coordinator::new(&registry, &runner, dir.path());
    let session = Session::start(&dir.path().join("reports"));

    let mut shell = Shell::new(coordinator, session, Cursor::new(input.to_string()));
    let mut transcript = Transcript::default();
    shell.run(&mut transcript).await?;
    Ok((dir, shell.into_session(), transcript))
}

#[tokio::test]
async fn scan_all_records_success_and_warning() -> Result<()> {
    let (_dir, session, _transcript) = run_shell("S\nQ\n").await?;

    let ledger = session.ledger();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get("1").map(|r| r.status()), Some(Status::Success));
    assert_eq!(ledger.get("1").and_then(|r| r.exit_code()), Some(0));
    assert_eq!(ledger.get("2").map(|r| r.status()), Some(Status::Warning));
    assert_eq!(ledger.get("2").and_then(|r| r.exit_code()), Some(2));

    let report = fs::read_to_string(session.report_path())?;
    let first = report.find("MODULE 1: Echo Success").expect("section 1");
    let second = report.find("MODULE 2: Exit Two").expect("section 2");
    assert!(first < second);
    assert!(report.contains("checked (scan)"));
    assert!(report.contains("ERRORS/WARNINGS:"));
    assert!(report.contains("PermitRootLogin"));
    Ok(())
}

#[tokio::test]
async fn declining_run_all_leaves_no_trace() -> Result<()> {
    let (dir, session, transcript) = run_shell("A\nno\nQ\n").await?;

    assert!(session.ledger().is_empty());
    assert!(!dir.path().join("reports").exists());
    assert!(transcript.lines.iter().any(|l| l == "Error: Cancelled."));
    Ok(())
}

#[tokio::test]
async fn repeated_runs_share_one_report_file() -> Result<()> {
    let (dir, session, _transcript) = run_shell("1\ns\n1\nf\nS\nq\n").await?;

    let reports: Vec<_> = fs::read_dir(dir.path().join("reports"))?.collect();
    assert_eq!(reports.len(), 1);

    let report = fs::read_to_string(session.report_path())?;
    assert_eq!(report.matches("MODULE 1:").count(), 1);
    assert_eq!(report.matches("MODULE 2:").count(), 1);
    assert!(report.contains("checked (scan)"));
    assert!(!report.contains("checked (fix)"));
    Ok(())
}

#[tokio::test]
async fn missing_script_is_recorded_as_error() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = Registry::new(vec![ModuleDescriptor::new("1", "Ghost", "ghost.sh")])?;
    let runner = ProcessRunner::new(Duration::from_secs(10)).with_interpreter("sh");
    let coordinator = Coordinator::new(&registry, &runner, dir.path());
    let mut session = Session::start(dir.path());
    let mut transcript = Transcript::default();

    coordinator.run_all(&mut session, true, &mut transcript).await?;

    let result = session.ledger().get("1").expect("ledger entry");
    assert_eq!(result.status(), Status::Error);
    assert_eq!(result.exit_code(), None);
    let report = fs::read_to_string(session.report_path())?;
    assert!(report.contains("Return Code: N/A"));
    assert!(report.contains("script not found"));
    Ok(())
}
