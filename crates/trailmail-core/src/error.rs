//! Trailmail error type, shared by every crate in the workspace.

use thiserror::Error;

/// Convenience alias used across trailmail crates.
pub type Result<T> = std::result::Result<T, TrailmailError>;

/// All the ways a campaign run can fail.
#[derive(Debug, Error)]
pub enum TrailmailError {
    /// Missing or malformed configuration (including absent secrets).
    #[error("Config error: {0}")]
    Config(String),

    /// The recipients file could not be read or parsed.
    #[error("Recipients error: {0}")]
    Recipients(String),

    /// SMTP transport or message construction failure.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Invalid schedule expression.
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
