//! Errors that can be thrown when resolving a connection string or reading client settings.

use std::path::PathBuf;

use crate::uri::SCHEME_PREFIX;

/// The connection string could not be resolved into a configuration.
///
/// Every variant carries the connection string exactly as the caller supplied it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid prefix, expected {prefix} got: {0}", prefix = SCHEME_PREFIX)]
    Scheme(String),
    #[error("failed to parse connection string {uri:?}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid connection string, no project id given: {0}")]
    MissingProject(String),
    #[error("invalid connection string, the project id is not valid UTF-8: {0}")]
    InvalidProject(String),
    #[error("invalid connection string, expected a path of the form /[location/]dataset: {0}")]
    Path(String),
    #[error("invalid connection string, a scope is not valid UTF-8: {0}")]
    Scopes(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("parse error on {}:{line}:{column}: {message}", .file_path.display())]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("I/O error reading {}: {source}", .file_path.display())]
    IoError {
        file_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
