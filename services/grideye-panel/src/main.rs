use clap::{Parser, Subcommand};
use grideye_panel::{
    load_config, CellCoord, Config, Interaction, PanelClient, Profile, SwitchStatus,
};
use std::path::PathBuf;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "grideye-panel")]
#[command(about = "Grid-eye thermal sensor panel client")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gateway host (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Gateway port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Panel profile: legacy or enhanced (overrides config file)
    #[arg(long)]
    profile: Option<Profile>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the gateway and render incoming frames
    Monitor {
        /// Log the binary grid after every frame
        #[arg(long)]
        grid: bool,
    },

    /// Reset the alarm
    ResetAlarm,

    /// Reset the background reference
    ResetBackground,

    /// Toggle a cell of the alarm mask (1-based coordinates)
    Cell { x: u32, y: u32 },

    /// Switch a near line-relay (1-8) on or off
    Nlr { index: u8, state: SwitchStatus },

    /// Switch a line-relay (1-3) on or off
    Lr { index: u8, state: SwitchStatus },

    /// Switch the thermal sensor on or off
    Sensor { state: SwitchStatus },

    /// Send raw text to the gateway
    Raw { text: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    debug!(
        "Parsed command line arguments: config={:?}, host={:?}, port={:?}, profile={:?}, log_level={:?}",
        args.config, args.host, args.port, args.profile, args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        debug!("Using default configuration");
        Config::default()
    };

    if let Some(host) = args.host {
        config.gateway.host = host;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    if let Some(profile) = args.profile {
        config.panel.profile = profile;
    }

    let interaction = match args.command {
        Commands::Monitor { grid } => {
            grideye_panel::run(config, grid).await?;
            return Ok(());
        }
        Commands::ResetAlarm => Interaction::ResetAlarm,
        Commands::ResetBackground => Interaction::ResetBackground,
        Commands::Cell { x, y } => Interaction::CellClicked(CellCoord::new(x, y)),
        Commands::Nlr { index, state } => Interaction::NearLineToggled {
            index,
            checked: state.is_on(),
        },
        Commands::Lr { index, state } => Interaction::LineRelayToggled {
            index,
            checked: state.is_on(),
        },
        Commands::Sensor { state } => Interaction::SensorToggled {
            checked: state.is_on(),
        },
        Commands::Raw { text } => Interaction::FreeText(text),
    };

    // Validate before opening the socket
    let payload = interaction.payload()?;

    let client = PanelClient::new(config);
    client.connect().await?;
    client.try_send(&payload).await?;
    info!("Sent {}", payload);
    client.disconnect().await?;

    Ok(())
}
