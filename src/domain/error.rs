//! Domain error types for the DebugFlow client.
//!
//! Validation failures in the upload workflow are advisory: the store logs them and the user
//! stays on the current step. The other variants surface through notifications.

use thiserror::Error;

use super::{ProjectId, UploadStep};

/// Upload workflow gate failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Action not available at step {0}")]
    UnexpectedStep(UploadStep),

    #[error("Choose a project type first")]
    NoProjectType,

    #[error("Project name is required")]
    NameRequired,

    #[error("At least one file is required")]
    FilesRequired,

    #[error("Repository URL is required")]
    CodebaseUrlRequired,

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("No submission is in progress")]
    NoSubmitInProgress,

    #[error("No file at index {0}")]
    FileIndexOutOfRange(usize),
}

/// Project collection errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    #[error("Invalid bug counts: {fixed} fixed exceeds {found} found")]
    InvalidCounts { found: u32, fixed: u32 },
}

/// Integration settings errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} is already connected")]
    AlreadyConnected(String),

    #[error("{0} is not connected")]
    NotConnected(String),

    #[error("Integration name must not be empty")]
    EmptyName,

    #[error("Nothing to undo")]
    NothingToUndo,
}
