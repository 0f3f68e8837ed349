use std::fmt;
use std::path::PathBuf;

/// Result type for pipetrace-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced by the engine.
///
/// Missing or malformed pipeline files never produce an error; only a bad
/// search root or an unusable configuration does.
#[derive(Debug)]
pub enum Error {
    /// Search root does not exist
    NotFound(PathBuf),

    /// Search root exists but is not a directory
    NotADirectory(PathBuf),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Core layer error
    Core(pipetrace_core::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(path) => write!(f, "Search root not found: {}", path.display()),
            Error::NotADirectory(path) => {
                write!(f, "Search root is not a directory: {}", path.display())
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Core(err) => write!(f, "Core error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Core(err) => Some(err),
            Error::NotFound(_) | Error::NotADirectory(_) | Error::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<pipetrace_core::Error> for Error {
    fn from(err: pipetrace_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
