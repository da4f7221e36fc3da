//! Script process management: permission fix-up, spawn, capture and timeout.

use std::{
    fs,
    os::unix::{fs::PermissionsExt, process::ExitStatusExt},
    path::{Path, PathBuf},
    process::Stdio,
    time::{Duration, Instant},
};

use tokio::{process::Command, time::timeout};
use tracing::{debug, info, warn};

use crate::{
    error::{HardenError, Result},
    execution::{ExecutionResult, Mode},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    interpreter: Option<String>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, interpreter: None }
    }
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, interpreter: None }
    }

    /// Pass scripts to `program` (e.g. `bash`) instead of executing them directly.
    pub fn with_interpreter(mut self, program: impl Into<String>) -> Self {
        self.interpreter = Some(program.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `script` with `mode` as its only argument.
    ///
    /// Never fails: problems launching or waiting on the script are folded
    /// into an `Error` result so one broken module cannot abort a pass.
    pub async fn execute(&self, script: &Path, mode: Mode) -> ExecutionResult {
        match self.try_execute(script, mode).await {
            Ok(result) => result,
            Err(e) => {
                warn!(script = %script.display(), %mode, error = %e, "script did not complete");
                ExecutionResult::failed(e.to_string())
            }
        }
    }

    async fn try_execute(&self, script: &Path, mode: Mode) -> Result<ExecutionResult> {
        if !script.is_file() {
            return Err(HardenError::ScriptNotFound(script.to_path_buf()));
        }
        ensure_executable(script)?;

        let script = spawnable_path(script);
        let mut cmd = match &self.interpreter {
            Some(program) => {
                let mut c = Command::new(program);
                c.arg(&script);
                c
            }
            None => Command::new(&script),
        };
        cmd.arg(mode.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(script = %script.display(), %mode, "running script");
        let start = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| HardenError::LaunchFailure(format!("{}: {}", script.display(), e)))?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| HardenError::Timeout(self.timeout))?
            .map_err(|e| HardenError::LaunchFailure(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match output.status.code() {
            Some(code) => {
                debug!(script = %script.display(), exit_code = code, elapsed_ms, "script exited");
                Ok(ExecutionResult::exited(code, stdout, stderr))
            }
            None => {
                let message = match output.status.signal() {
                    Some(sig) => format!("terminated by signal {sig}"),
                    None => "terminated without an exit code".to_string(),
                };
                warn!(script = %script.display(), elapsed_ms, "{message}");
                Ok(ExecutionResult::failed_with_output(message, stdout, stderr))
            }
        }
    }
}

/// Add the execute bits if the owner cannot run the file yet.
fn ensure_executable(script: &Path) -> Result<()> {
    let launch_err = |e: std::io::Error| HardenError::LaunchFailure(format!("{}: {}", script.display(), e));
    let mut perms = fs::metadata(script).map_err(launch_err)?.permissions();
    if perms.mode() & 0o100 == 0 {
        perms.set_mode(perms.mode() | 0o755);
        fs::set_permissions(script, perms).map_err(launch_err)?;
        debug!(script = %script.display(), "marked script executable");
    }
    Ok(())
}

/// A bare file name would be looked up on `PATH`; anchor it to the cwd instead.
fn spawnable_path(script: &Path) -> PathBuf {
    match script.parent() {
        Some(p) if !p.as_os_str().is_empty() => script.to_path_buf(),
        _ => Path::new(".").join(script),
    }
}
