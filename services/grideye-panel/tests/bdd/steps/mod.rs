//! BDD step definitions for the grid-eye panel

pub mod command_steps;
pub mod rendering_steps;
