//! Outbound commands sent from the panel to the sensor gateway
//!
//! Each variant serializes to exactly one JSON object shape understood by
//! the gateway, for example `{"NLR":3,"STATUS":"ON"}` or `{"X":3,"Y":5}`.

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::frame::{CellCoord, LINE_RELAYS, NEAR_LINE_RELAYS};

/// `ON`/`OFF` status attached to relay and sensor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchStatus {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl From<bool> for SwitchStatus {
    fn from(on: bool) -> Self {
        if on {
            SwitchStatus::On
        } else {
            SwitchStatus::Off
        }
    }
}

impl std::str::FromStr for SwitchStatus {
    type Err = PanelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ON" => Ok(SwitchStatus::On),
            "OFF" => Ok(SwitchStatus::Off),
            _ => Err(PanelError::InvalidCommand(format!(
                "Expected ON or OFF, got {}",
                s
            ))),
        }
    }
}

impl SwitchStatus {
    pub fn is_on(self) -> bool {
        self == SwitchStatus::On
    }
}

/// The only action the panel requests for the alarm and the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetAction {
    #[serde(rename = "RESET")]
    Reset,
}

/// Source tag of the startup handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandSource {
    #[serde(rename = "WEB")]
    Web,
}

/// Request carried by the startup handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiRequest {
    /// Ask the gateway to replay the full UI state (alarm mask cells and mode)
    #[serde(rename = "UPDATE_UI")]
    UpdateUi,
}

/// A command understood by the sensor gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Handshake {
        #[serde(rename = "SRC")]
        source: CommandSource,
        #[serde(rename = "CMD")]
        request: UiRequest,
    },
    /// Toggle a cell of the alarm mask
    SelectCell {
        #[serde(rename = "X")]
        x: u32,
        #[serde(rename = "Y")]
        y: u32,
    },
    Alarm {
        #[serde(rename = "ALARM")]
        alarm: ResetAction,
    },
    Background {
        #[serde(rename = "BACKGROUND")]
        background: ResetAction,
    },
    NearLineRelay {
        #[serde(rename = "NLR")]
        index: u8,
        #[serde(rename = "STATUS")]
        status: SwitchStatus,
    },
    LineRelay {
        #[serde(rename = "LR")]
        index: u8,
        #[serde(rename = "STATUS")]
        status: SwitchStatus,
    },
    /// Enable or disable the thermal sensor
    Sensor {
        #[serde(rename = "GE")]
        sensor: u8,
        #[serde(rename = "STATUS")]
        status: SwitchStatus,
    },
}

impl Command {
    /// Startup handshake requesting a full UI state refresh
    pub fn handshake() -> Self {
        Command::Handshake {
            source: CommandSource::Web,
            request: UiRequest::UpdateUi,
        }
    }

    pub fn select_cell(coord: CellCoord) -> Self {
        Command::SelectCell {
            x: coord.x,
            y: coord.y,
        }
    }

    pub fn reset_alarm() -> Self {
        Command::Alarm {
            alarm: ResetAction::Reset,
        }
    }

    pub fn reset_background() -> Self {
        Command::Background {
            background: ResetAction::Reset,
        }
    }

    /// Switch near line-relay `index` (1..=8)
    pub fn near_line_relay(index: u8, on: bool) -> Result<Self> {
        check_index("NLR", index, NEAR_LINE_RELAYS)?;
        Ok(Command::NearLineRelay {
            index,
            status: on.into(),
        })
    }

    /// Switch line-relay `index` (1..=3)
    pub fn line_relay(index: u8, on: bool) -> Result<Self> {
        check_index("LR", index, LINE_RELAYS)?;
        Ok(Command::LineRelay {
            index,
            status: on.into(),
        })
    }

    pub fn sensor(on: bool) -> Self {
        Command::Sensor {
            sensor: 1,
            status: on.into(),
        }
    }

    /// JSON text sent on the wire
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a command from its JSON text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn check_index(group: &str, index: u8, count: usize) -> Result<()> {
    if index == 0 || usize::from(index) > count {
        return Err(PanelError::InvalidCommand(format!(
            "{} index {} out of range 1..={}",
            group, index, count
        )));
    }
    Ok(())
}
