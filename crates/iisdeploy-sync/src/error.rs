use crate::DeployReport;
use thiserror::Error;

/// Errors from deploying a package to IIS servers.
#[derive(Debug, Error)]
pub enum Error {
    /// Preparing the package failed before any server was contacted.
    #[error(transparent)]
    Package(#[from] iisdeploy_package::Error),

    /// A required environment key is absent or empty.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// An external program could not be run or exited unsuccessfully.
    #[error("{program} failed: {reason}")]
    ExternalToolFailure { program: String, reason: String },

    /// The deployment was cancelled before any server was contacted.
    #[error("deployment cancelled")]
    Cancelled,

    /// At least one server was not synchronised.
    #[error("deployment incomplete: {0}")]
    Rollout(DeployReport),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for iisdeploy-sync operations.
pub type Result<T> = std::result::Result<T, Error>;
