//! In-memory panel
//!
//! `PanelModel` holds the same elements as the browser page: a status label,
//! the `nlr1..nlr8` and `lr1..lr3` indicators, an alarm indicator, four mode
//! options, the heat map and the 8x8 binary grid. It is the headless panel
//! used by the CLI and the renderer double used throughout the tests.

use std::fmt::Write as _;

use crate::error::{PanelError, Result};
use crate::frame::{CellCoord, DetectionMode, LINE_RELAYS, NEAR_LINE_RELAYS};
use crate::render::{LineGroup, PanelRenderer, StatusVariant};

/// State of one cell of the binary grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryCell {
    /// Cell is part of the alarm mask
    pub active: bool,
    pub background: Option<String>,
    pub text: Option<String>,
}

/// Headless panel holding the last rendered state
#[derive(Debug, Clone)]
pub struct PanelModel {
    status_text: String,
    status_variant: Option<StatusVariant>,
    near_lines: [bool; NEAR_LINE_RELAYS],
    line_relays: [bool; LINE_RELAYS],
    alarm_blinking: bool,
    mode: Option<DetectionMode>,
    heat_rows: usize,
    heat_columns: usize,
    heat: Vec<Option<String>>,
    binary_rows: usize,
    binary_columns: usize,
    binary: Vec<BinaryCell>,
    last_update: Option<String>,
}

impl Default for PanelModel {
    fn default() -> Self {
        Self::new(64, 64)
    }
}

impl PanelModel {
    /// Panel with the given heat map layout and an 8x8 binary grid
    pub fn new(heat_rows: usize, heat_columns: usize) -> Self {
        Self::with_layout(heat_rows, heat_columns, 8, 8)
    }

    pub fn with_layout(
        heat_rows: usize,
        heat_columns: usize,
        binary_rows: usize,
        binary_columns: usize,
    ) -> Self {
        Self {
            status_text: String::new(),
            status_variant: None,
            near_lines: [false; NEAR_LINE_RELAYS],
            line_relays: [false; LINE_RELAYS],
            alarm_blinking: false,
            mode: None,
            heat_rows,
            heat_columns,
            heat: vec![None; heat_rows * heat_columns],
            binary_rows,
            binary_columns,
            binary: vec![BinaryCell::default(); binary_rows * binary_columns],
            last_update: None,
        }
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn status_variant(&self) -> Option<StatusVariant> {
        self.status_variant
    }

    /// Checked state of indicator `index` (1-based), `None` if there is no such indicator
    pub fn line(&self, group: LineGroup, index: usize) -> Option<bool> {
        let lines: &[bool] = match group {
            LineGroup::NearLine => &self.near_lines,
            LineGroup::LineRelay => &self.line_relays,
        };
        index.checked_sub(1).and_then(|i| lines.get(i).copied())
    }

    pub fn alarm_blinking(&self) -> bool {
        self.alarm_blinking
    }

    pub fn mode(&self) -> Option<DetectionMode> {
        self.mode
    }

    pub fn heat_colour(&self, row: usize, column: usize) -> Option<&str> {
        if row >= self.heat_rows || column >= self.heat_columns {
            return None;
        }
        self.heat[row * self.heat_columns + column].as_deref()
    }

    pub fn binary_cell(&self, coord: CellCoord) -> Option<&BinaryCell> {
        self.binary_index(coord).map(|i| &self.binary[i])
    }

    /// Coordinates of every alarm mask cell, row-major
    pub fn active_cells(&self) -> Vec<CellCoord> {
        self.binary
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.active)
            .map(|(i, _)| CellCoord::from_index(i, self.binary_columns))
            .collect()
    }

    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }

    /// Text picture of the binary grid: `#` for white cells, `.` for black or
    /// unpainted ones, and `[ ]` around alarm mask cells.
    pub fn binary_grid_ascii(&self) -> String {
        let mut out = String::new();
        for row in 0..self.binary_rows {
            for column in 0..self.binary_columns {
                let cell = &self.binary[row * self.binary_columns + column];
                let mark = match cell.background.as_deref() {
                    Some(crate::colour::WHITE) => '#',
                    _ => '.',
                };
                if cell.active {
                    let _ = write!(out, "[{}]", mark);
                } else {
                    let _ = write!(out, " {} ", mark);
                }
            }
            out.push('\n');
        }
        out
    }

    fn binary_index(&self, coord: CellCoord) -> Option<usize> {
        let row = (coord.x as usize).checked_sub(1)?;
        let column = (coord.y as usize).checked_sub(1)?;
        if row >= self.binary_rows || column >= self.binary_columns {
            return None;
        }
        Some(row * self.binary_columns + column)
    }

    fn binary_cell_mut(&mut self, coord: CellCoord) -> Result<&mut BinaryCell> {
        let index = self.binary_index(coord).ok_or_else(|| {
            PanelError::MissingElement(format!("row-bw-{} col-bw-{}", coord.x, coord.y))
        })?;
        Ok(&mut self.binary[index])
    }
}

impl PanelRenderer for PanelModel {
    fn set_status_text(&mut self, text: &str) -> Result<()> {
        self.status_text = text.to_string();
        Ok(())
    }

    fn set_status_variant(&mut self, variant: StatusVariant) -> Result<()> {
        self.status_variant = Some(variant);
        Ok(())
    }

    fn set_line_checked(&mut self, group: LineGroup, index: usize, checked: bool) -> Result<()> {
        let lines: &mut [bool] = match group {
            LineGroup::NearLine => &mut self.near_lines,
            LineGroup::LineRelay => &mut self.line_relays,
        };
        let slot = index
            .checked_sub(1)
            .and_then(|i| lines.get_mut(i))
            .ok_or_else(|| PanelError::MissingElement(group.element_id(index)))?;
        *slot = checked;
        Ok(())
    }

    fn set_alarm_blinking(&mut self, blinking: bool) -> Result<()> {
        self.alarm_blinking = blinking;
        Ok(())
    }

    fn is_cell_active(&self, coord: CellCoord) -> Result<bool> {
        self.binary_cell(coord).map(|cell| cell.active).ok_or_else(|| {
            PanelError::MissingElement(format!("row-bw-{} col-bw-{}", coord.x, coord.y))
        })
    }

    fn set_cell_active(&mut self, coord: CellCoord, active: bool) -> Result<()> {
        self.binary_cell_mut(coord)?.active = active;
        Ok(())
    }

    fn select_mode(&mut self, mode: DetectionMode) -> Result<()> {
        self.mode = Some(mode);
        Ok(())
    }

    fn heat_grid_size(&self) -> (usize, usize) {
        (self.heat_rows, self.heat_columns)
    }

    fn set_heat_background(&mut self, row: usize, column: usize, colour: &str) -> Result<()> {
        if row >= self.heat_rows || column >= self.heat_columns {
            return Err(PanelError::MissingElement(format!("heat cell {},{}", row, column)));
        }
        self.heat[row * self.heat_columns + column] = Some(colour.to_string());
        Ok(())
    }

    fn binary_grid_size(&self) -> (usize, usize) {
        (self.binary_rows, self.binary_columns)
    }

    fn set_binary_background(&mut self, coord: CellCoord, colour: &str) -> Result<()> {
        self.binary_cell_mut(coord)?.background = Some(colour.to_string());
        Ok(())
    }

    fn set_binary_text(&mut self, coord: CellCoord, text: &str) -> Result<()> {
        self.binary_cell_mut(coord)?.text = Some(text.to_string());
        Ok(())
    }

    fn set_last_update(&mut self, timestamp: &str) -> Result<()> {
        self.last_update = Some(timestamp.to_string());
        Ok(())
    }
}
