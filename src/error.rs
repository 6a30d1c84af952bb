//! Error types shared across the presence pipeline

/// Failures talking to the external display client (Discord).
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The display application is not running or refused the handshake.
    #[error("display client unavailable: {0}")]
    Unavailable(String),

    /// The connection dropped while an update was in flight.
    #[error("display connection closed: {0}")]
    TransportClosed(String),

    /// The client is connected but rejected this particular request.
    #[error("display client rejected request: {0}")]
    Rejected(String),
}

impl DisplayError {
    /// Whether the session must drop its connection and reconnect on the next tick.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::TransportClosed(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed game state payload: {0}")]
    Malformed(String),
}

/// A tick that could not complete. The driver logs it and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error(transparent)]
    Display(#[from] DisplayError),
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to start game state listener on port {port}: {reason}")]
    Bind { port: u16, reason: String },

    #[error("failed to write game state integration config: {0}")]
    Install(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
