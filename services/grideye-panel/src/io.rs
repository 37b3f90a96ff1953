//! Transport traits and WebSocket implementations
//!
//! The client only talks to the gateway through [`MessageReader`],
//! [`MessageWriter`] and [`ConnectionFactory`], so tests can substitute
//! scripted connections for a real socket.
//!
//! The default implementations use a `tokio-tungstenite` WebSocket carrying
//! UTF-8 text frames.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::error::{PanelError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection pair containing a reader and writer
pub struct ConnectionPair {
    /// Reader for receiving messages
    pub reader: Box<dyn MessageReader>,
    /// Writer for sending messages
    pub writer: Box<dyn MessageWriter>,
}

// ============================================================================
// MessageReader trait and implementations
// ============================================================================

/// Trait for reading text messages from a connection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageReader: Send {
    /// Read the next text message
    ///
    /// Returns `Ok(Some(text))` for a message, `Ok(None)` once the connection
    /// has been closed, or an error if the transport failed.
    async fn read_message(&mut self) -> Result<Option<String>>;
}

/// WebSocket implementation of MessageReader
pub struct WsMessageReader {
    stream: SplitStream<WsStream>,
}

impl WsMessageReader {
    pub fn new(stream: SplitStream<WsStream>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl MessageReader for WsMessageReader {
    async fn read_message(&mut self) -> Result<Option<String>> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(PanelError::ReceiveError(e.to_string())),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(Message::Close(frame))) => {
                    debug!("Close frame received: {:?}", frame);
                    return Ok(None);
                }
                // Binary and control frames carry nothing for the panel.
                Some(Ok(other)) => trace!("Skipping non-text frame: {:?}", other),
            }
        }
    }
}

// ============================================================================
// MessageWriter trait and implementations
// ============================================================================

/// Trait for writing text messages to a connection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageWriter: Send {
    /// Send one text message verbatim
    async fn write_message(&mut self, message: &str) -> Result<()>;

    /// Close the connection
    async fn shutdown(&mut self) -> Result<()>;
}

/// WebSocket implementation of MessageWriter
pub struct WsMessageWriter {
    sink: SplitSink<WsStream, Message>,
}

impl WsMessageWriter {
    pub fn new(sink: SplitSink<WsStream, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl MessageWriter for WsMessageWriter {
    async fn write_message(&mut self, message: &str) -> Result<()> {
        self.sink
            .send(Message::Text(message.into()))
            .await
            .map_err(|e| PanelError::SendError(e.to_string()))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.sink
            .close()
            .await
            .map_err(|e| PanelError::SendError(e.to_string()))
    }
}

// ============================================================================
// ConnectionFactory trait and implementations
// ============================================================================

/// Trait for opening connections to the gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Open a connection to `url`, failing after `timeout`
    async fn connect(&self, url: &str, timeout: Duration) -> Result<ConnectionPair>;
}

/// WebSocket implementation of ConnectionFactory
#[derive(Default, Clone)]
pub struct WsConnectionFactory;

impl WsConnectionFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectionFactory for WsConnectionFactory {
    async fn connect(&self, url: &str, timeout: Duration) -> Result<ConnectionPair> {
        debug!("Connecting to {} with timeout {:?}", url, timeout);

        let (stream, _response) =
            tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url))
                .await
                .map_err(|_| PanelError::Timeout(format!("Connection to {} timed out", url)))?
                .map_err(|e| {
                    PanelError::ConnectionFailed(format!("Failed to connect to {}: {}", url, e))
                })?;

        debug!("WebSocket connection established to {}", url);

        let (sink, stream) = stream.split();
        Ok(ConnectionPair {
            reader: Box::new(WsMessageReader::new(stream)),
            writer: Box::new(WsMessageWriter::new(sink)),
        })
    }
}
