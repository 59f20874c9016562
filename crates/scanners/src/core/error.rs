use thiserror::Error;

/// Failures surfaced to callers of on-demand execution and configuration
/// resolution. The auto-run path logs these instead of returning them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid scanner reference: {0}")]
    InvalidScanner(String),

    #[error("scanner '{scanner}' failed: {source}")]
    ScannerFailed {
        scanner: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("scanner '{scanner}' panicked: {message}")]
    ScannerPanicked { scanner: String, message: String },

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl EngineError {
    /// The error the scanner itself produced, if this is a scanner fault.
    pub fn scanner_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::ScannerFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
