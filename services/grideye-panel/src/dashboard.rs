//! Glue between socket events and a panel renderer

use tracing::debug;

use crate::connection::{EventReceiver, PanelEvent};
use crate::frame::Frame;
use crate::render::{FrameRenderer, PanelRenderer, Profile, StatusVariant};

/// Drives a [`PanelRenderer`] from the client's event stream
#[derive(Debug)]
pub struct Dashboard<R: PanelRenderer> {
    renderer: R,
    rules: FrameRenderer,
}

impl<R: PanelRenderer> Dashboard<R> {
    pub fn new(renderer: R, profile: Profile) -> Self {
        Self {
            renderer,
            rules: FrameRenderer::new(profile),
        }
    }

    pub fn profile(&self) -> Profile {
        self.rules.profile()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Update the panel for one socket event
    pub fn handle_event(&mut self, event: &PanelEvent) {
        let status = match event {
            PanelEvent::Opened => ("open", StatusVariant::Connected),
            PanelEvent::Message(text) => {
                self.handle_message(text);
                return;
            }
            PanelEvent::Closed { .. } => ("closed", StatusVariant::Closed),
            PanelEvent::Error { .. } => ("error occurred", StatusVariant::Error),
        };
        if let Err(e) = self.renderer.set_status(status.0, status.1) {
            debug!("Failed to update status label: {}", e);
        }
    }

    /// Decode and render one inbound message
    ///
    /// Returns `true` when the message decoded to a frame. Messages that are
    /// not JSON objects leave the panel unchanged apart from the status style,
    /// and are dropped without a log entry. A renderer error stops the
    /// remaining rules of that frame, also silently.
    pub fn handle_message(&mut self, text: &str) -> bool {
        if let Err(e) = self.renderer.set_status_variant(StatusVariant::Info) {
            debug!("Failed to update status style: {}", e);
        }

        let Some(frame) = Frame::decode(text) else {
            return false;
        };

        let _ = self.rules.apply(&frame, &mut self.renderer);
        true
    }

    /// Render events until the socket closes or fails
    pub async fn run(&mut self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.handle_event(&event);
            if matches!(event, PanelEvent::Closed { .. } | PanelEvent::Error { .. }) {
                break;
            }
        }
    }
}
