//! Grid-eye panel - Thermal sensor panel client
//!
//! Connects to a sensor gateway over a WebSocket, renders every inbound frame
//! onto a panel (relay indicators, alarm, detection mode, heat map and the
//! 8x8 binary grid) and sends operator commands back to the gateway.

pub mod bindings;
pub mod client;
pub mod colour;
pub mod command;
pub mod config;
pub mod connection;
pub mod dashboard;
pub mod error;
pub mod frame;
pub mod io;
pub mod model;
pub mod render;

pub use bindings::{CommandInput, Interaction};
pub use client::PanelClient;
pub use command::{Command, SwitchStatus};
pub use config::{load_config, Config, GatewayConfig, PanelConfig};
pub use connection::{ConnectionStatus, EventReceiver, PanelEvent};
pub use dashboard::Dashboard;
pub use error::{PanelError, Result};
pub use frame::{CellCoord, DetectionMode, FlagState, Frame, GeStatistics};
pub use model::PanelModel;
pub use render::{FrameRenderer, LineGroup, PanelRenderer, Profile, StatusVariant};

use tracing::{debug, info};

/// Build an empty headless panel with the configured layout
pub fn panel_model(config: &PanelConfig) -> PanelModel {
    PanelModel::with_layout(
        config.heat_grid_rows,
        config.heat_grid_columns,
        config.binary_grid_rows,
        config.binary_grid_columns,
    )
}

/// Monitor the gateway until the socket closes or Ctrl-C is pressed
///
/// Each rendered frame is reported through `tracing`; with `show_grid` the
/// binary grid is logged as text as well.
pub async fn run(config: Config, show_grid: bool) -> Result<()> {
    let profile = config.panel.profile;
    let mut dashboard = Dashboard::new(panel_model(&config.panel), profile);
    let client = PanelClient::new(config);
    let mut events = client.subscribe();

    info!("Connecting to {} ({} profile)", client.config().gateway.url(), profile);
    client.connect().await?;

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Some(event) => {
                    dashboard.handle_event(&event);
                    report(&dashboard, &event, show_grid);
                    if matches!(event, PanelEvent::Closed { .. } | PanelEvent::Error { .. }) {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing connection");
                client.disconnect().await?;
                break;
            }
        }
    }

    Ok(())
}

fn report(dashboard: &Dashboard<PanelModel>, event: &PanelEvent, show_grid: bool) {
    let panel = dashboard.renderer();
    match event {
        PanelEvent::Message(_) => {
            info!("{}", panel.status_text());
            debug!(
                "alarm={} mode={:?} mask={:?}",
                panel.alarm_blinking(),
                panel.mode(),
                panel.active_cells()
            );
            if show_grid {
                info!("\n{}", panel.binary_grid_ascii());
            }
        }
        PanelEvent::Closed { reason } | PanelEvent::Error { reason } => {
            info!("{}: {}", panel.status_text(), reason);
        }
        PanelEvent::Opened => info!("{}", panel.status_text()),
    }
}
