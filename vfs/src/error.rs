use std::fmt;

/// Errors produced while fetching asset bytes.
#[derive(Debug)]
pub enum FetchError {
    /// Nothing is stored at the path.
    NotFound(String),
    /// The backing store failed.
    Io(std::io::Error),
    /// The path is empty or tries to escape its mount.
    InvalidPath(String),
    /// The first path segment names no mounted provider and there is no default.
    NoSuchSource(String),
    /// The fetch has not completed yet.
    WouldBlock,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "asset not found: {path}"),
            Self::Io(err) => write!(f, "asset IO error: {err}"),
            Self::InvalidPath(reason) => write!(f, "invalid asset path: {reason}"),
            Self::NoSuchSource(name) => write!(f, "no provider mounted as '{name}'"),
            Self::WouldBlock => write!(f, "fetch still in flight"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err),
        }
    }
}
