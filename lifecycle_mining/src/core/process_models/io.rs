//! Error type shared by process model IO

/// Error type for process model (tree, net) IO operations
#[derive(Debug)]
pub enum ModelIOError {
    /// IO Error
    Io(std::io::Error),
    /// JSON Error
    Json(serde_json::Error),
    /// Unsupported Format
    UnsupportedFormat(String),
}

impl std::fmt::Display for ModelIOError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelIOError::Io(e) => write!(f, "IO Error: {}", e),
            ModelIOError::Json(e) => write!(f, "JSON Error: {}", e),
            ModelIOError::UnsupportedFormat(s) => write!(f, "Unsupported Format: {}", s),
        }
    }
}

impl std::error::Error for ModelIOError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelIOError::Io(e) => Some(e),
            ModelIOError::Json(e) => Some(e),
            ModelIOError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for ModelIOError {
    fn from(e: std::io::Error) -> Self {
        ModelIOError::Io(e)
    }
}

impl From<serde_json::Error> for ModelIOError {
    fn from(e: serde_json::Error) -> Self {
        ModelIOError::Json(e)
    }
}

/// Write `value` as JSON if `format` names JSON
pub(crate) fn export_json<T: serde::Serialize, W: std::io::Write>(
    value: &T,
    writer: W,
    format: &str,
) -> Result<(), ModelIOError> {
    if format.ends_with("json") {
        serde_json::to_writer(writer, value)?;
        Ok(())
    } else {
        Err(ModelIOError::UnsupportedFormat(format.to_string()))
    }
}
