//! BDD test world for the grid-eye panel

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use cucumber::World;
use grideye_panel::io::{ConnectionFactory, ConnectionPair, MessageReader, MessageWriter};
use grideye_panel::{Dashboard, PanelClient, PanelModel};

#[derive(Debug, Default, World)]
pub struct PanelWorld {
    // Rendering
    pub dashboard: Option<Dashboard<PanelModel>>,

    // Commands
    pub client: Option<PanelClient>,
    pub sent: Arc<StdMutex<Vec<String>>>,
    pub last_error: Option<grideye_panel::PanelError>,
}

impl PanelWorld {
    pub fn dashboard(&mut self) -> &mut Dashboard<PanelModel> {
        self.dashboard.as_mut().expect("panel not set up")
    }

    pub fn panel(&self) -> &PanelModel {
        self.dashboard.as_ref().expect("panel not set up").renderer()
    }

    pub fn client(&self) -> &PanelClient {
        self.client.as_ref().expect("client not connected")
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

/// Reader for a gateway that never pushes anything
struct IdleReader;

#[async_trait]
impl MessageReader for IdleReader {
    async fn read_message(&mut self) -> grideye_panel::Result<Option<String>> {
        std::future::pending().await
    }
}

/// Writer standing in for the gateway's receiving end
struct RecordingWriter {
    sent: Arc<StdMutex<Vec<String>>>,
}

#[async_trait]
impl MessageWriter for RecordingWriter {
    async fn write_message(&mut self, message: &str) -> grideye_panel::Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn shutdown(&mut self) -> grideye_panel::Result<()> {
        Ok(())
    }
}

/// Factory whose connections record everything the client sends
pub struct RecordingGateway {
    pub sent: Arc<StdMutex<Vec<String>>>,
}

#[async_trait]
impl ConnectionFactory for RecordingGateway {
    async fn connect(
        &self,
        _url: &str,
        _timeout: Duration,
    ) -> grideye_panel::Result<ConnectionPair> {
        Ok(ConnectionPair {
            reader: Box::new(IdleReader),
            writer: Box::new(RecordingWriter {
                sent: self.sent.clone(),
            }),
        })
    }
}
