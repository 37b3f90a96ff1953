//! Inbound frames pushed by the sensor gateway
//!
//! A frame is a single JSON object whose keys are all optional. Each key is
//! decoded on its own: a key holding the wrong type decodes as absent and
//! never prevents the other keys of the same frame from being used.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire keys used by the gateway
pub mod keys {
    pub const TIME: &str = "TIME";
    pub const SRC: &str = "SRC";
    pub const CMD: &str = "CMD";
    pub const NLR: &str = "NLR";
    pub const LR: &str = "LR";
    pub const ALARM: &str = "ALARM";
    pub const BACKGROUND: &str = "BACKGROUND";
    pub const CELL: &str = "CELL";
    pub const X: &str = "X";
    pub const Y: &str = "Y";
    pub const MODE: &str = "MODE";
    pub const STATUS: &str = "STATUS";
    pub const GE: &str = "GE";
    pub const GE_MAX: &str = "GE_MAX";
    pub const GE_MIN: &str = "GE_MIN";
    pub const GE_AVG: &str = "GE_AVG";
    pub const GE_MDN: &str = "GE_MDN";
    pub const GE_STD: &str = "GE_STD";
    pub const GE_BINARY: &str = "GE_BINARY";
    pub const GE_TEMP: &str = "GE_TEMP";
    pub const GE_PIXEL_COLOUR: &str = "GE_PIXEL_COLOUR";
}

/// Number of near line-relay indicators (bits 0-7 of `NLR`)
pub const NEAR_LINE_RELAYS: usize = 8;

/// Number of line-relay indicators (bits 0-2 of `LR`)
pub const LINE_RELAYS: usize = 3;

/// Two-valued `SET`/`RESET` flag used by `ALARM` and `CELL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagState {
    #[serde(rename = "SET")]
    Set,
    #[serde(rename = "RESET")]
    Reset,
}

/// Object detection mode reported by the gateway's image processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Object temperature above an absolute threshold
    Absolute,
    /// Object temperature above the background by a threshold
    Differential,
    /// Both thresholds must pass
    Both,
    /// Either threshold passes
    Any,
}

impl DetectionMode {
    /// Decode the integer code carried by `MODE`
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DetectionMode::Absolute),
            2 => Some(DetectionMode::Differential),
            3 => Some(DetectionMode::Both),
            4 => Some(DetectionMode::Any),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            DetectionMode::Absolute => 1,
            DetectionMode::Differential => 2,
            DetectionMode::Both => 3,
            DetectionMode::Any => 4,
        }
    }

    pub fn all() -> [DetectionMode; 4] {
        [
            DetectionMode::Absolute,
            DetectionMode::Differential,
            DetectionMode::Both,
            DetectionMode::Any,
        ]
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMode::Absolute => write!(f, "Absolute"),
            DetectionMode::Differential => write!(f, "Differential"),
            DetectionMode::Both => write!(f, "Both"),
            DetectionMode::Any => write!(f, "Any"),
        }
    }
}

/// 1-based coordinates of a cell in the binary grid (`X` = row, `Y` = column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Coordinates of the cell at a row-major index in a grid with `columns` columns
    pub fn from_index(index: usize, columns: usize) -> Self {
        Self {
            x: (index / columns + 1) as u32,
            y: (index % columns + 1) as u32,
        }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A `CELL` instruction together with its `X`/`Y` coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub state: FlagState,
    pub coord: CellCoord,
}

/// Summary statistics of the thermal frame, in degrees Celsius
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeStatistics {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

impl GeStatistics {
    pub fn is_empty(&self) -> bool {
        self.max.is_none()
            && self.min.is_none()
            && self.avg.is_none()
            && self.median.is_none()
            && self.std_dev.is_none()
    }
}

/// One decoded gateway message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Gateway timestamp (`TIME`)
    pub timestamp: Option<String>,
    /// Originating component (`SRC`)
    pub source: Option<String>,
    pub nlr: Option<i64>,
    pub lr: Option<i64>,
    pub alarm: Option<FlagState>,
    pub cell: Option<CellUpdate>,
    pub mode: Option<DetectionMode>,
    /// Thermal image, row-major
    pub ge: Option<Vec<f64>>,
    pub statistics: GeStatistics,
    /// Binarized 8x8 presence grid, row-major
    pub ge_binary: Option<Vec<i64>>,
    /// Temperatures aligned to `ge_binary`
    pub ge_temp: Option<Vec<f64>>,
    /// Precomputed heat map colours (legacy gateways)
    pub ge_pixel_colour: Option<Vec<String>>,
}

impl Frame {
    /// Decode a text message.
    ///
    /// Returns `None` when the text is not JSON or not a JSON object.
    pub fn decode(text: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(text).ok()? {
            Value::Object(map) => Some(Self::from_map(&map)),
            _ => None,
        }
    }

    /// Build a frame from an already parsed JSON object
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let cell = match (
            typed::<FlagState>(map, keys::CELL),
            coordinate(map, keys::X),
            coordinate(map, keys::Y),
        ) {
            (Some(state), Some(x), Some(y)) => Some(CellUpdate {
                state,
                coord: CellCoord { x, y },
            }),
            _ => None,
        };

        Self {
            timestamp: typed(map, keys::TIME),
            source: typed(map, keys::SRC),
            nlr: integer(map, keys::NLR),
            lr: integer(map, keys::LR),
            alarm: typed(map, keys::ALARM),
            cell,
            mode: integer(map, keys::MODE).and_then(DetectionMode::from_code),
            ge: typed(map, keys::GE),
            statistics: GeStatistics {
                max: number(map, keys::GE_MAX),
                min: number(map, keys::GE_MIN),
                avg: number(map, keys::GE_AVG),
                median: number(map, keys::GE_MDN),
                std_dev: number(map, keys::GE_STD),
            },
            ge_binary: typed(map, keys::GE_BINARY),
            ge_temp: typed(map, keys::GE_TEMP),
            ge_pixel_colour: typed(map, keys::GE_PIXEL_COLOUR),
        }
    }
}

/// Per-indicator states of a line mask: entry `i` is bit `i` of `mask`
pub fn line_states<const N: usize>(mask: i64) -> [bool; N] {
    std::array::from_fn(|i| (mask >> i) & 1 == 1)
}

fn typed<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key).and_then(|v| T::deserialize(v).ok())
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

// Integral floats such as `5.0` are accepted; fractional values are not.
fn integer(map: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = map.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn coordinate(map: &Map<String, Value>, key: &str) -> Option<u32> {
    integer(map, key).and_then(|v| u32::try_from(v).ok())
}
