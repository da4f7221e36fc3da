//! Error taxonomy shared by the registry, runner, coordinator and shell.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HardenError {
    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("failed to launch script: {0}")]
    LaunchFailure(String),

    #[error("execution timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("this tool must be run as root")]
    InsufficientPrivilege,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid module manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),

    #[error("failed to read operator input: {0}")]
    Input(#[source] io::Error),
}

/// Construction-time problems with the module list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("module id {0:?} collides with a reserved menu option")]
    ReservedId(String),

    #[error("module id {0:?} is registered more than once")]
    DuplicateId(String),

    #[error("module id must not be empty")]
    EmptyId,
}

pub type Result<T> = std::result::Result<T, HardenError>;
