//! Connection lifecycle to the external presence display

use crate::error::DisplayError;

use super::payload::PresencePayload;

/// Transport to a presence display such as Discord.
///
/// The application identity is fixed when the client is constructed.
#[allow(async_fn_in_trait)]
pub trait DisplayClient {
    /// Returns the name of this display (for logging)
    fn name(&self) -> &'static str;

    async fn connect(&mut self) -> Result<(), DisplayError>;

    async fn update(&mut self, payload: &PresencePayload) -> Result<(), DisplayError>;

    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Tears down the connection. Must not fail.
    async fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns a [`DisplayClient`] and tracks whether it is usable.
pub struct DisplaySession<C> {
    client: C,
    state: ConnectionState,
}

impl<C: DisplayClient> DisplaySession<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Attempts to connect. Failures are logged and reported as `false`, never raised.
    pub async fn connect(&mut self) -> bool {
        if self.is_connected() {
            return true;
        }

        self.state = ConnectionState::Connecting;
        match self.client.connect().await {
            Ok(()) => {
                tracing::info!("Connected to {}", self.client.name());
                self.state = ConnectionState::Connected;
                true
            }
            Err(e) => {
                tracing::debug!("{} connection failed: {}", self.client.name(), e);
                self.state = ConnectionState::Disconnected;
                false
            }
        }
    }

    fn handle_failure(&mut self, error: DisplayError) -> DisplayError {
        if error.is_disconnect() {
            tracing::warn!("{} connection lost: {}", self.client.name(), error);
            self.state = ConnectionState::Disconnected;
        }
        error
    }

    pub async fn push(&mut self, payload: &PresencePayload) -> Result<(), DisplayError> {
        if !self.is_connected() {
            return Err(DisplayError::Unavailable("not connected".to_string()));
        }
        match self.client.update(payload).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.handle_failure(e)),
        }
    }

    pub async fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.is_connected() {
            return Err(DisplayError::Unavailable("not connected".to_string()));
        }
        match self.client.clear().await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.handle_failure(e)),
        }
    }

    /// Best-effort clear and disconnect.
    pub async fn close(&mut self) {
        if self.is_connected() {
            if let Err(e) = self.client.clear().await {
                tracing::debug!("Ignoring clear failure during close: {}", e);
            }
        }
        self.client.close().await;
        self.state = ConnectionState::Disconnected;
    }
}
