//! Menu-driven runner for Linux hardening scripts.
//!
//! Each hardening module is an external script invoked with `scan` or `fix`.
//! Results are kept per session and written to a plain-text report.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod execution;
pub mod printer;
pub mod privilege;
pub mod process;
pub mod registry;
pub mod report;
pub mod session;
pub mod shell;

pub use coordinator::Coordinator;
pub use error::{HardenError, RegistryError};
pub use execution::{ExecutionResult, Mode, Status};
pub use printer::{ConsolePrinter, Level, StatusSink};
pub use process::ProcessRunner;
pub use registry::{ModuleDescriptor, Registry};
pub use session::{Ledger, Session};
pub use shell::Shell;
