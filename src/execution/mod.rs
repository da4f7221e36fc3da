//! Execution model: run modes and the result of one script invocation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scan,
    Fix,
}

impl Mode {
    pub fn from_scan_only(scan_only: bool) -> Self {
        if scan_only {
            Self::Scan
        } else {
            Self::Fix
        }
    }

    /// The positional argument handed to the script.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Fix => "fix",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single script invocation.
///
/// Fields are private so the status always agrees with the exit code:
/// `Success` iff the code is 0, `Warning` iff it is non-zero, `Error` iff
/// there is no code at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    status: Status,
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    message: Option<String>,
}

impl ExecutionResult {
    /// The script ran to completion and exited with `code`.
    pub fn exited(code: i32, stdout: String, stderr: String) -> Self {
        let status = if code == 0 { Status::Success } else { Status::Warning };
        Self { status, exit_code: Some(code), stdout, stderr, message: None }
    }

    /// The script could not be run, or did not produce an exit code.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::failed_with_output(message, String::new(), String::new())
    }

    pub fn failed_with_output(message: impl Into<String>, stdout: String, stderr: String) -> Self {
        Self {
            status: Status::Error,
            exit_code: None,
            stdout,
            stderr,
            message: Some(message.into()),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
