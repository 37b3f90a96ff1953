//! Rendering rules that turn decoded frames into panel updates
//!
//! The panel itself is abstracted behind [`PanelRenderer`], a small set of
//! capability methods. [`FrameRenderer`] evaluates the rules of one
//! [`Profile`] against a frame, one rule per group of fields. A renderer
//! error aborts the remaining rules of that frame only.

use serde::{Deserialize, Serialize};

use crate::colour::{ColourScale, BLACK, WHITE};
use crate::error::{PanelError, Result};
use crate::frame::{
    line_states, CellCoord, CellUpdate, DetectionMode, FlagState, Frame, GeStatistics,
    LINE_RELAYS, NEAR_LINE_RELAYS,
};

/// Which of the two panel layouts the gateway is talking to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Single heat map painted from precomputed colours
    Legacy,
    /// Heat map coloured client-side plus binary grid, alarm and mode controls
    #[default]
    Enhanced,
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Legacy => write!(f, "legacy"),
            Profile::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = PanelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Profile::Legacy),
            "enhanced" => Ok(Profile::Enhanced),
            _ => Err(PanelError::Config(format!("Unknown profile: {}", s))),
        }
    }
}

/// Visual state of the status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusVariant {
    Connected,
    /// A message has been received
    Info,
    Closed,
    Error,
}

/// The two groups of line-relay indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineGroup {
    NearLine,
    LineRelay,
}

impl LineGroup {
    /// Number of indicators in the group
    pub fn count(self) -> usize {
        match self {
            LineGroup::NearLine => NEAR_LINE_RELAYS,
            LineGroup::LineRelay => LINE_RELAYS,
        }
    }

    /// Element id of indicator `index` (1-based), e.g. `nlr3`
    pub fn element_id(self, index: usize) -> String {
        match self {
            LineGroup::NearLine => format!("nlr{}", index),
            LineGroup::LineRelay => format!("lr{}", index),
        }
    }
}

/// Capabilities the rendering rules need from a panel
pub trait PanelRenderer {
    fn set_status_text(&mut self, text: &str) -> Result<()>;

    fn set_status_variant(&mut self, variant: StatusVariant) -> Result<()>;

    fn set_status(&mut self, text: &str, variant: StatusVariant) -> Result<()> {
        self.set_status_variant(variant)?;
        self.set_status_text(text)
    }

    /// Check or uncheck line indicator `index` (1-based) of `group`
    fn set_line_checked(&mut self, group: LineGroup, index: usize, checked: bool) -> Result<()>;

    fn set_alarm_blinking(&mut self, blinking: bool) -> Result<()>;

    fn is_cell_active(&self, coord: CellCoord) -> Result<bool>;

    fn set_cell_active(&mut self, coord: CellCoord, active: bool) -> Result<()>;

    /// Select exactly one detection mode option
    fn select_mode(&mut self, mode: DetectionMode) -> Result<()>;

    /// Heat map layout as `(rows, columns)`
    fn heat_grid_size(&self) -> (usize, usize);

    fn set_heat_background(&mut self, row: usize, column: usize, colour: &str) -> Result<()>;

    /// Binary grid layout as `(rows, columns)`
    fn binary_grid_size(&self) -> (usize, usize);

    fn set_binary_background(&mut self, coord: CellCoord, colour: &str) -> Result<()>;

    fn set_binary_text(&mut self, coord: CellCoord, text: &str) -> Result<()>;

    /// Gateway timestamp of the latest frame
    fn set_last_update(&mut self, _timestamp: &str) -> Result<()> {
        Ok(())
    }
}

/// Applies the rules of one profile to decoded frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRenderer {
    profile: Profile,
}

impl FrameRenderer {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Apply every rule of the profile to `frame`
    pub fn apply<R: PanelRenderer + ?Sized>(&self, frame: &Frame, renderer: &mut R) -> Result<()> {
        match self.profile {
            Profile::Enhanced => apply_enhanced(frame, renderer),
            Profile::Legacy => apply_legacy(frame, renderer),
        }
    }
}

fn apply_enhanced<R: PanelRenderer + ?Sized>(frame: &Frame, renderer: &mut R) -> Result<()> {
    if let Some(timestamp) = &frame.timestamp {
        renderer.set_last_update(timestamp)?;
    }
    if let Some(mask) = frame.nlr {
        render_lines(LineGroup::NearLine, mask, renderer)?;
    }
    if let Some(mask) = frame.lr {
        render_lines(LineGroup::LineRelay, mask, renderer)?;
    }
    if let Some(alarm) = frame.alarm {
        renderer.set_alarm_blinking(alarm == FlagState::Set)?;
    }
    if let Some(update) = frame.cell {
        render_cell(update, renderer)?;
    }
    if let Some(mode) = frame.mode {
        renderer.select_mode(mode)?;
    }
    if frame.ge.is_some() || !frame.statistics.is_empty() {
        renderer.set_status_text(&enhanced_summary(&frame.statistics))?;
    }
    if let Some(values) = &frame.ge {
        render_heat_map(values, &frame.statistics, renderer)?;
    }
    if let Some(binary) = &frame.ge_binary {
        render_binary(binary, frame.ge_temp.as_deref(), renderer)?;
    }
    Ok(())
}

fn apply_legacy<R: PanelRenderer + ?Sized>(frame: &Frame, renderer: &mut R) -> Result<()> {
    render_lines(LineGroup::NearLine, frame.nlr.unwrap_or(0), renderer)?;
    render_lines(LineGroup::LineRelay, frame.lr.unwrap_or(0), renderer)?;
    renderer.set_status_text(&legacy_summary(&frame.statistics))?;
    render_pixel_colours(frame.ge_pixel_colour.as_deref(), renderer)
}

/// Status text of the enhanced panel
pub fn enhanced_summary(stats: &GeStatistics) -> String {
    format!(
        "Max: {}℃ - Min: {}℃ - Mean: {}℃ - Med: {}℃ - Std Dev: {}℃",
        format_statistic(stats.max),
        format_statistic(stats.min),
        format_statistic(stats.avg),
        format_statistic(stats.median),
        format_statistic(stats.std_dev)
    )
}

/// Status text of the legacy panel
pub fn legacy_summary(stats: &GeStatistics) -> String {
    format!(
        "Max: {}℃ - Min: {}℃ - Avg: {}℃",
        format_statistic(stats.max),
        format_statistic(stats.min),
        format_statistic(stats.avg)
    )
}

/// Two decimals, or `N/A` when the statistic is missing
pub fn format_statistic(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

fn render_lines<R: PanelRenderer + ?Sized>(
    group: LineGroup,
    mask: i64,
    renderer: &mut R,
) -> Result<()> {
    let states = match group {
        LineGroup::NearLine => line_states::<NEAR_LINE_RELAYS>(mask).to_vec(),
        LineGroup::LineRelay => line_states::<LINE_RELAYS>(mask).to_vec(),
    };
    for (i, checked) in states.into_iter().enumerate() {
        renderer.set_line_checked(group, i + 1, checked)?;
    }
    Ok(())
}

fn render_cell<R: PanelRenderer + ?Sized>(update: CellUpdate, renderer: &mut R) -> Result<()> {
    let active = renderer.is_cell_active(update.coord)?;
    match update.state {
        FlagState::Set if !active => renderer.set_cell_active(update.coord, true),
        FlagState::Reset if active => renderer.set_cell_active(update.coord, false),
        _ => Ok(()),
    }
}

fn render_heat_map<R: PanelRenderer + ?Sized>(
    values: &[f64],
    stats: &GeStatistics,
    renderer: &mut R,
) -> Result<()> {
    let (rows, columns) = renderer.heat_grid_size();
    let (data_min, data_max) = value_range(values);
    let scale = ColourScale::new(stats.min.unwrap_or(data_min), stats.max.unwrap_or(data_max));
    // Cells past the shorter of layout and payload are left untouched.
    for (index, value) in values.iter().take(rows * columns).enumerate() {
        renderer.set_heat_background(index / columns, index % columns, &scale.colour_at(*value))?;
    }
    Ok(())
}

fn render_pixel_colours<R: PanelRenderer + ?Sized>(
    colours: Option<&[String]>,
    renderer: &mut R,
) -> Result<()> {
    let (rows, columns) = renderer.heat_grid_size();
    for index in 0..rows * columns {
        let colour = match colours {
            Some(colours) => match colours.get(index) {
                Some(colour) => colour.as_str(),
                None => continue,
            },
            None => BLACK,
        };
        renderer.set_heat_background(index / columns, index % columns, colour)?;
    }
    Ok(())
}

fn render_binary<R: PanelRenderer + ?Sized>(
    binary: &[i64],
    temperatures: Option<&[f64]>,
    renderer: &mut R,
) -> Result<()> {
    let (rows, columns) = renderer.binary_grid_size();
    for (index, value) in binary.iter().take(rows * columns).enumerate() {
        let coord = CellCoord::from_index(index, columns);
        renderer.set_binary_background(coord, if *value == 1 { WHITE } else { BLACK })?;
        if let Some(temperature) = temperatures.and_then(|t| t.get(index)) {
            renderer.set_binary_text(coord, &format!("{:.2}", temperature))?;
        }
    }
    Ok(())
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}
