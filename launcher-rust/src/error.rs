use std::path::PathBuf;

use thiserror::Error;

/// Fatal bootstrap failures. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(
        "Could not find the application payload at:\n{}\nPlease make sure you have extracted all files correctly.",
        .path.display()
    )]
    PayloadNotFound { path: PathBuf },

    #[error(
        "Could not find a Java runtime at any of the following locations:\n{}\n\n{}\nPlease make sure you have extracted all files correctly.",
        .older.display(),
        .newer.display()
    )]
    RuntimeNotFound { older: PathBuf, newer: PathBuf },

    #[error("Failed to build command line (longer than {limit} bytes)")]
    CommandTooLong { limit: usize },

    #[error("Failed to start {product}.\nCommand line: {command}\n{reason}")]
    LaunchFailed {
        product: String,
        command: String,
        reason: String,
    },
}
