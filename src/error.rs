//! Error type for settings, store synchronization and presentation

use std::fmt;

/// Errors surfaced by the library.
///
/// The relaxation passes themselves never fail; errors only come from
/// configuration, from running passes on an unsynchronized mirror, or from
/// the external presentation surface.
#[derive(Debug)]
pub enum SimError {
    /// Settings failed validation
    InvalidSettings(String),
    /// Host view was edited but not pushed to the compute mirror
    StaleMirror,
    /// Pixel buffer could not be acquired or has the wrong size
    Surface(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
            SimError::StaleMirror => {
                write!(f, "host ball data changed without a push to the compute mirror")
            }
            SimError::Surface(msg) => write!(f, "presentation surface unavailable: {msg}"),
            SimError::Io(err) => write!(f, "i/o error: {err}"),
            SimError::Json(err) => write!(f, "settings parse error: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(err) => Some(err),
            SimError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Json(err)
    }
}
