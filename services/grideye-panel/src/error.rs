//! Error types for the grid-eye panel client

/// Errors that can occur while talking to the sensor gateway or updating the panel
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Not connected to the sensor gateway")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Failed to send message: {0}")]
    SendError(String),

    #[error("Failed to receive message: {0}")]
    ReceiveError(String),

    #[error("Panel element not found: {0}")]
    MissingElement(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
