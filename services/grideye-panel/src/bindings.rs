//! User interactions and the messages they produce
//!
//! Every control on the panel maps to one [`Interaction`]. Most interactions
//! become a JSON [`Command`]; the free-text command box sends its contents
//! verbatim.

use crate::command::Command;
use crate::error::Result;
use crate::frame::CellCoord;

/// One user action on the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A binary grid cell was clicked
    CellClicked(CellCoord),
    ResetAlarm,
    ResetBackground,
    /// Near line-relay checkbox `index` (1-based) changed
    NearLineToggled { index: u8, checked: bool },
    LineRelayToggled { index: u8, checked: bool },
    SensorToggled { checked: bool },
    /// Contents of the command input, sent as typed
    FreeText(String),
}

impl Interaction {
    /// The JSON command for this interaction, `None` for free text
    pub fn command(&self) -> Result<Option<Command>> {
        let command = match self {
            Interaction::CellClicked(coord) => Command::select_cell(*coord),
            Interaction::ResetAlarm => Command::reset_alarm(),
            Interaction::ResetBackground => Command::reset_background(),
            Interaction::NearLineToggled { index, checked } => {
                Command::near_line_relay(*index, *checked)?
            }
            Interaction::LineRelayToggled { index, checked } => {
                Command::line_relay(*index, *checked)?
            }
            Interaction::SensorToggled { checked } => Command::sensor(*checked),
            Interaction::FreeText(_) => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Text to put on the socket
    pub fn payload(&self) -> Result<String> {
        match self {
            Interaction::FreeText(text) => Ok(text.clone()),
            other => match other.command()? {
                Some(command) => command.to_payload(),
                None => Ok(String::new()),
            },
        }
    }
}

/// Free-text command box
///
/// Submitting sends the text as typed and clears the box.
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
    value: String,
}

impl CommandInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Take the current text, leaving the box empty
    pub fn submit(&mut self) -> Interaction {
        Interaction::FreeText(std::mem::take(&mut self.value))
    }
}
