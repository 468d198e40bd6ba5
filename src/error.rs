//! Error types for asset loading and preload configuration.

use std::fmt;

/// Why an asset could not be made available.
///
/// Every variant is treated the same way by the loader: images fall back to
/// a placeholder, videos to `None`. The split only exists for log messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The server answered, but not with a usable resource.
    NotFound { path: String, status: Option<u16> },
    /// The request itself failed (network, CORS, aborted, ...).
    Transport { path: String, reason: String },
}

impl AssetError {
    /// The logical asset path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            AssetError::NotFound { path, .. } | AssetError::Transport { path, .. } => path,
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path, status: Some(code) } => {
                write!(f, "Asset '{}' not found (HTTP {})", path, code)
            }
            AssetError::NotFound { path, status: None } => write!(f, "Asset '{}' not found", path),
            AssetError::Transport { path, reason } => {
                write!(f, "Failed to fetch asset '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Errors raised while building a route preload table.
#[derive(Debug)]
pub enum RouteTableError {
    Csv(csv::Error),
    /// A row had an empty route or asset column (1-based line number).
    EmptyField { line: u64 },
    /// Route paths must be absolute.
    RelativeRoute { line: u64, route: String },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTableError::Csv(err) => write!(f, "Invalid route table CSV: {}", err),
            RouteTableError::EmptyField { line } => {
                write!(f, "Route table line {} has an empty field", line)
            }
            RouteTableError::RelativeRoute { line, route } => write!(
                f,
                "Route table line {}: route '{}' must start with '/'",
                line, route
            ),
        }
    }
}

impl std::error::Error for RouteTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteTableError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for RouteTableError {
    fn from(err: csv::Error) -> Self {
        RouteTableError::Csv(err)
    }
}
