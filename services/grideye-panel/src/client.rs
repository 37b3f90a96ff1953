//! Gateway client for the thermal sensor panel

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::bindings::Interaction;
use crate::command::Command;
use crate::config::Config;
use crate::connection::{
    spawn_reader_task, ConnectionStatus, EventReceiver, PanelEvent, SharedConnectionState,
};
use crate::error::{PanelError, Result};
use crate::io::{ConnectionFactory, WsConnectionFactory};
use crate::render::Profile;

/// WebSocket client talking to the sensor gateway
///
/// Inbound messages are published as [`PanelEvent`]s to every subscriber;
/// outbound commands go through [`PanelClient::send_command`] or
/// [`PanelClient::dispatch`].
pub struct PanelClient {
    config: Config,
    shared: SharedConnectionState,
    connection_factory: Arc<dyn ConnectionFactory>,
}

impl std::fmt::Debug for PanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PanelClient {
    /// Create a client using the WebSocket connection factory
    pub fn new(config: Config) -> Self {
        Self::with_connection_factory(config, Arc::new(WsConnectionFactory::new()))
    }

    /// Create a client with a custom connection factory
    ///
    /// This is useful for testing with scripted connections.
    pub fn with_connection_factory(
        config: Config,
        connection_factory: Arc<dyn ConnectionFactory>,
    ) -> Self {
        Self {
            config,
            shared: SharedConnectionState::new(),
            connection_factory,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profile(&self) -> Profile {
        self.config.panel.profile
    }

    /// Open the socket to the gateway
    ///
    /// Subscribers receive [`PanelEvent::Opened`] once the socket is up. In
    /// the enhanced profile the UI refresh handshake is sent before any
    /// inbound message is delivered. The writer lock is held from the
    /// connected check until the reader task is running, so concurrent calls
    /// open at most one socket.
    pub async fn connect(&self) -> Result<()> {
        let handshake = match self.profile() {
            Profile::Enhanced => Some(Command::handshake().to_payload()?),
            Profile::Legacy => None,
        };

        let mut writer_guard = self.shared.writer.lock().await;
        if writer_guard.is_some() || self.is_connected().await {
            return Err(PanelError::ConnectionFailed(
                "Already connected to gateway".to_string(),
            ));
        }

        let url = self.config.gateway.url();
        debug!("Connecting to gateway at {}", url);

        let timeout = Duration::from_secs(self.config.gateway.connection_timeout_seconds);
        let connection_pair = match self.connection_factory.connect(&url, timeout).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Gateway connection failed: {}", e);
                self.shared.set_status(ConnectionStatus::Error).await;
                self.shared.emit(PanelEvent::Error {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let writer = writer_guard.insert(connection_pair.writer);
        self.shared.set_status(ConnectionStatus::Open).await;
        self.shared.emit(PanelEvent::Opened);

        if let Some(handshake) = handshake {
            debug!("Sending to gateway: {}", handshake);
            if let Err(e) = writer.write_message(&handshake).await {
                warn!("Failed to send handshake: {}", e);
            }
        }

        let reader_handle = spawn_reader_task(connection_pair.reader, self.shared.clone());
        {
            let mut handle_guard = self.shared.reader_handle.lock().await;
            *handle_guard = Some(reader_handle);
        }
        drop(writer_guard);

        debug!("Panel client connected and reader task started");
        Ok(())
    }

    /// Close the socket; no further events are delivered after `Closed`
    pub async fn disconnect(&self) -> Result<()> {
        debug!("Disconnecting from gateway");

        {
            let mut handle = self.shared.reader_handle.lock().await;
            if let Some(h) = handle.take() {
                h.abort();
            }
        }
        self.shared.close_writer().await;

        if self.shared.status().await == ConnectionStatus::Open {
            self.shared.set_status(ConnectionStatus::Closed).await;
            self.shared.emit(PanelEvent::Closed {
                reason: "Disconnected by client".to_string(),
            });
        }

        debug!("Disconnected from gateway");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.shared.status().await == ConnectionStatus::Open
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.shared.status().await
    }

    /// Subscribe to socket events
    ///
    /// Subscribe before calling [`PanelClient::connect`] to observe
    /// `Opened` and every message that follows it. Every event reaches every
    /// subscriber in the order it was emitted.
    pub fn subscribe(&self) -> EventReceiver {
        self.shared.subscribe()
    }

    /// Send a text message if the socket is open
    ///
    /// Messages sent while the socket is not open are dropped without error.
    pub async fn send(&self, message: &str) {
        match self.try_send(message).await {
            Ok(()) => {}
            Err(PanelError::NotConnected) => trace!("Dropping message while closed: {}", message),
            Err(e) => warn!("Failed to send message: {}", e),
        }
    }

    /// Send a text message, reporting when it could not be sent
    pub async fn try_send(&self, message: &str) -> Result<()> {
        if !self.is_connected().await {
            return Err(PanelError::NotConnected);
        }

        let mut writer_guard = self.shared.writer.lock().await;
        match writer_guard.as_mut() {
            Some(writer) => {
                debug!("Sending to gateway: {}", message);
                writer.write_message(message).await
            }
            None => Err(PanelError::NotConnected),
        }
    }

    /// Encode and send a command; dropped silently while the socket is closed
    pub async fn send_command(&self, command: &Command) -> Result<()> {
        let payload = command.to_payload()?;
        self.send(&payload).await;
        Ok(())
    }

    /// Translate a user interaction into its outbound message and send it
    pub async fn dispatch(&self, interaction: &Interaction) -> Result<()> {
        let payload = interaction.payload()?;
        self.send(&payload).await;
        Ok(())
    }
}
