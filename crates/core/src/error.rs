/// Result alias that carries the custom [`ModVizError`] type.
pub type Result<T> = std::result::Result<T, ModVizError>;

/// Common error type for the core crate.
///
/// The per-frame modulation path never produces these; they only appear at
/// the preset boundary where JSON and the filesystem get involved.
#[derive(Debug, thiserror::Error)]
pub enum ModVizError {
    /// Free-form message raised by callers that have nothing structured to
    /// attach.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Preset JSON that failed to encode or decode.
    #[error("preset serialization failed: {0}")]
    Preset(#[from] serde_json::Error),
}

impl ModVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ModVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ModVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
