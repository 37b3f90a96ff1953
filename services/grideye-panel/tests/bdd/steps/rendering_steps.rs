//! BDD step definitions for frame rendering

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use grideye_panel::{
    CellCoord, Dashboard, DetectionMode, LineGroup, PanelModel, PanelRenderer, Profile,
};

use crate::world::PanelWorld;

fn parse_profile(s: &str) -> Profile {
    s.parse().unwrap_or_else(|_| panic!("Unknown profile: {}", s))
}

fn parse_group(s: &str) -> LineGroup {
    match s {
        "near-line" => LineGroup::NearLine,
        "line-relay" => LineGroup::LineRelay,
        other => panic!("Unknown indicator group: {}", other),
    }
}

fn parse_indices(s: &str) -> Vec<usize> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "none")
        .map(|part| part.parse().expect("indicator index"))
        .collect()
}

#[given(expr = "a/an {word} panel")]
fn panel_with_profile(world: &mut PanelWorld, profile: String) {
    world.dashboard = Some(Dashboard::new(
        PanelModel::new(64, 64),
        parse_profile(&profile),
    ));
}

#[given(expr = "a/an {word} panel with a {int}x{int} heat map")]
fn panel_with_layout(world: &mut PanelWorld, profile: String, rows: usize, columns: usize) {
    world.dashboard = Some(Dashboard::new(
        PanelModel::new(rows, columns),
        parse_profile(&profile),
    ));
}

#[when("the gateway sends:")]
fn gateway_sends(world: &mut PanelWorld, step: &Step) {
    let message = step.docstring.as_deref().expect("message docstring").trim();
    world.dashboard().handle_message(message);
}

#[when(expr = "the gateway sends the text {string}")]
fn gateway_sends_text(world: &mut PanelWorld, text: String) {
    world.dashboard().handle_message(&text);
}

#[then(expr = "exactly the {word} indicators {string} are checked")]
fn indicators_checked(world: &mut PanelWorld, group: String, indices: String) {
    let group = parse_group(&group);
    let expected = parse_indices(&indices);
    let actual: Vec<usize> = (1..=group.count())
        .filter(|i| world.panel().line(group, *i) == Some(true))
        .collect();
    assert_eq!(actual, expected);
}

#[then("the alarm indicator is blinking")]
fn alarm_blinking(world: &mut PanelWorld) {
    assert!(world.panel().alarm_blinking());
}

#[then("the alarm indicator is not blinking")]
fn alarm_not_blinking(world: &mut PanelWorld) {
    assert!(!world.panel().alarm_blinking());
}

#[then(expr = "the status text is {string}")]
fn status_text(world: &mut PanelWorld, expected: String) {
    assert_eq!(world.panel().status_text(), expected);
}

#[then("no heat map cell has a colour")]
fn heat_map_untouched(world: &mut PanelWorld) {
    let panel = world.panel();
    let (rows, columns) = panel.heat_grid_size();
    for row in 0..rows {
        for column in 0..columns {
            assert_eq!(panel.heat_colour(row, column), None, "cell {},{}", row, column);
        }
    }
}

#[then(expr = "heat map cell {int},{int} is {string}")]
fn heat_cell_colour(world: &mut PanelWorld, row: usize, column: usize, colour: String) {
    assert_eq!(world.panel().heat_colour(row, column), Some(colour.as_str()));
}

#[then(expr = "the binary cell at row {int} column {int} is active")]
fn binary_cell_active(world: &mut PanelWorld, x: u32, y: u32) {
    assert!(world.panel().is_cell_active(CellCoord::new(x, y)).unwrap());
}

#[then(expr = "{int} binary cell(s) is/are active")]
fn active_cell_count(world: &mut PanelWorld, count: usize) {
    assert_eq!(world.panel().active_cells().len(), count);
}

#[then(expr = "the binary cell at row {int} column {int} shows {string}")]
fn binary_cell_text(world: &mut PanelWorld, x: u32, y: u32, text: String) {
    let cell = world
        .panel()
        .binary_cell(CellCoord::new(x, y))
        .expect("binary cell");
    assert_eq!(cell.text.as_deref(), Some(text.as_str()));
}

#[then(expr = "the detection mode is {word}")]
fn detection_mode(world: &mut PanelWorld, mode: String) {
    let actual = world.panel().mode().map(|m: DetectionMode| m.to_string());
    assert_eq!(actual.as_deref(), Some(mode.as_str()));
}
