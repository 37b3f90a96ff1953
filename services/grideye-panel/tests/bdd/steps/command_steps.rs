//! BDD step definitions for operator commands

use std::sync::Arc;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use grideye_panel::{CellCoord, CommandInput, Config, Interaction, PanelClient, Profile};

use crate::world::{PanelWorld, RecordingGateway};

async fn dispatch(world: &mut PanelWorld, interaction: Interaction) {
    let result = world.client().dispatch(&interaction).await;
    if let Err(e) = result {
        world.last_error = Some(e);
    }
}

fn switch(state: &str) -> bool {
    match state {
        "on" => true,
        "off" => false,
        other => panic!("Unknown switch state: {}", other),
    }
}

#[given(expr = "a/an {word} panel connected to the gateway")]
async fn connected_panel(world: &mut PanelWorld, profile: String) {
    let profile: Profile = profile.parse().expect("profile");
    let mut config = Config::default();
    config.panel.profile = profile;

    let gateway = Arc::new(RecordingGateway {
        sent: world.sent.clone(),
    });
    let client = PanelClient::with_connection_factory(config, gateway);
    client.connect().await.expect("connect");
    world.client = Some(client);
}

#[given("the panel has disconnected")]
async fn panel_disconnected(world: &mut PanelWorld) {
    world.client().disconnect().await.expect("disconnect");
}

#[when(expr = "the operator clicks the binary cell at row {int} column {int}")]
async fn click_cell(world: &mut PanelWorld, x: u32, y: u32) {
    dispatch(world, Interaction::CellClicked(CellCoord::new(x, y))).await;
}

#[when("the operator presses the alarm reset button")]
async fn reset_alarm(world: &mut PanelWorld) {
    dispatch(world, Interaction::ResetAlarm).await;
}

#[when("the operator presses the background reset button")]
async fn reset_background(world: &mut PanelWorld) {
    dispatch(world, Interaction::ResetBackground).await;
}

#[when(expr = "the operator switches near-line relay {int} {word}")]
async fn toggle_near_line(world: &mut PanelWorld, index: u8, state: String) {
    let checked = switch(&state);
    dispatch(world, Interaction::NearLineToggled { index, checked }).await;
}

#[when(expr = "the operator switches line-relay {int} {word}")]
async fn toggle_line_relay(world: &mut PanelWorld, index: u8, state: String) {
    let checked = switch(&state);
    dispatch(world, Interaction::LineRelayToggled { index, checked }).await;
}

#[when(expr = "the operator switches the sensor {word}")]
async fn toggle_sensor(world: &mut PanelWorld, state: String) {
    let checked = switch(&state);
    dispatch(world, Interaction::SensorToggled { checked }).await;
}

#[when(expr = "the operator submits {string} in the command box")]
async fn submit_free_text(world: &mut PanelWorld, text: String) {
    let mut input = CommandInput::new();
    input.set_value(text);
    let interaction = input.submit();
    assert_eq!(input.value(), "");
    dispatch(world, interaction).await;
}

#[then("the gateway receives:")]
fn gateway_receives(world: &mut PanelWorld, step: &Step) {
    let expected = step.docstring.as_deref().expect("message docstring").trim();
    let sent = world.sent();
    assert_eq!(sent.last().map(String::as_str), Some(expected), "sent: {:?}", sent);
}

#[then("the first message the gateway receives is:")]
fn gateway_first_message(world: &mut PanelWorld, step: &Step) {
    let expected = step.docstring.as_deref().expect("message docstring").trim();
    let sent = world.sent();
    assert_eq!(sent.first().map(String::as_str), Some(expected), "sent: {:?}", sent);
}

#[then("the gateway has received nothing")]
fn gateway_received_nothing(world: &mut PanelWorld) {
    assert!(world.sent().is_empty(), "sent: {:?}", world.sent());
}

#[then(expr = "the gateway has received {int} message(s)")]
fn gateway_message_count(world: &mut PanelWorld, count: usize) {
    assert_eq!(world.sent().len(), count);
}

#[then("the command is rejected")]
fn command_rejected(world: &mut PanelWorld) {
    assert!(
        matches!(
            world.last_error,
            Some(grideye_panel::PanelError::InvalidCommand(_))
        ),
        "last error: {:?}",
        world.last_error
    );
}
