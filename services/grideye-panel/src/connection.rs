//! Connection management for the panel client
//!
//! Holds the state shared between the client and its reader task, and the
//! reader task itself. The reader forwards every text message in arrival
//! order as a [`PanelEvent`]. When the socket closes or fails the reader
//! reports it once and stops; there is no reconnection.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::io::{MessageReader, MessageWriter};

/// Receiving end of a subscription to [`PanelEvent`]s
///
/// Each subscriber owns an unbounded queue, so a slow consumer never loses
/// events; it only falls behind.
pub type EventReceiver = mpsc::UnboundedReceiver<PanelEvent>;

/// Lifecycle state of the gateway socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No connection has been attempted yet
    #[default]
    Disconnected,
    Open,
    Closed,
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Open => write!(f, "Open"),
            ConnectionStatus::Closed => write!(f, "Closed"),
            ConnectionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Socket lifecycle and message events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Opened,
    /// One inbound text message, undecoded
    Message(String),
    Closed { reason: String },
    Error { reason: String },
}

/// State shared between the client and the reader task
#[derive(Clone)]
pub(crate) struct SharedConnectionState {
    pub status: Arc<RwLock<ConnectionStatus>>,
    pub writer: Arc<Mutex<Option<Box<dyn MessageWriter>>>>,
    pub subscribers: Arc<StdMutex<Vec<mpsc::UnboundedSender<PanelEvent>>>>,
    pub reader_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SharedConnectionState {
    pub fn new() -> Self {
        Self {
            status: Arc::new(RwLock::new(ConnectionStatus::default())),
            writer: Arc::new(Mutex::new(None)),
            subscribers: Arc::new(StdMutex::new(Vec::new())),
            reader_handle: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn status(&self) -> ConnectionStatus {
        *self.status.read().await
    }

    pub async fn set_status(&self, status: ConnectionStatus) {
        *self.status.write().await = status;
    }

    pub fn subscribe(&self) -> EventReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Queue an event for every live subscriber; dropped receivers are pruned
    pub fn emit(&self, event: PanelEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Drop the writer, closing the socket if it is still open
    pub async fn close_writer(&self) {
        let mut writer_guard = self.writer.lock().await;
        if let Some(mut w) = writer_guard.take() {
            let _ = w.shutdown().await;
        }
    }
}

/// Spawn a task that forwards gateway messages until the socket ends
pub(crate) fn spawn_reader_task(
    mut reader: Box<dyn MessageReader>,
    shared: SharedConnectionState,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (status, event) = loop {
            match reader.read_message().await {
                Ok(Some(text)) => {
                    trace!("Received from gateway: {}", text);
                    shared.emit(PanelEvent::Message(text));
                }
                Ok(None) => {
                    debug!("Gateway connection closed");
                    break (
                        ConnectionStatus::Closed,
                        PanelEvent::Closed {
                            reason: "Connection closed by remote".to_string(),
                        },
                    );
                }
                Err(e) => {
                    break (
                        ConnectionStatus::Error,
                        PanelEvent::Error {
                            reason: format!("Read error: {}", e),
                        },
                    );
                }
            }
        };

        shared.set_status(status).await;
        shared.close_writer().await;

        warn!("Gateway connection lost: {:?}", event);
        shared.emit(event);
    })
}
