use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing a deployment package.
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment key is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The environment document could not be read as key/value pairs.
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    /// The extracted package holds no `Web.config`.
    #[error("no Web.config found under {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The parameter descriptor is missing or malformed.
    #[error("parameters parse error: {0}")]
    ParseError(String),

    /// A package entry would be written outside the extraction directory.
    #[error("unsafe package entry: {0}")]
    UnsafeEntry(String),

    /// The template engine could not produce the configuration file.
    #[error("template configuration failed: {0}")]
    ExternalToolFailure(String),

    /// Error from the zip library.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for iisdeploy-package operations.
pub type Result<T> = std::result::Result<T, Error>;
