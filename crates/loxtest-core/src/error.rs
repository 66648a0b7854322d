//! Error types shared by discovery and execution

use std::path::PathBuf;
use thiserror::Error;

/// Fatal harness errors
///
/// Per-fixture problems are not errors: they are reported as
/// [`crate::SkippedFixture`] entries and discovery carries on.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Test directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to spawn {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to collect output of {executable}: {source}")]
    Wait {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for harness operations
pub type CoreResult<T> = Result<T, CoreError>;
