//! Text shown next to the drawing

use crate::simulation::engine::{PauseReason, RunState};
use crate::simulation::scenario::Scenario;

/// Numeric readouts, two decimals each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readouts {
    pub acceleration: String,
    pub velocity: String,
    pub tension: String,
    pub time: String,
}

impl Readouts {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let state = &scenario.state;
        Self {
            acceleration: format!("{:.2}", state.acceleration()),
            velocity: format!("{:.2}", state.velocity),
            tension: format!("{:.2}", state.tension()),
            time: format!("{:.2}", state.time),
        }
    }
}

pub fn status_label(scenario: &Scenario) -> &'static str {
    match (scenario.run_state(), scenario.engine.pause_reason()) {
        (RunState::Idle, _) => "Ready",
        (RunState::Running, _) => "Running",
        (RunState::Paused, Some(PauseReason::RopeExhausted)) => "Stopped: rope fully extended (R to reset)",
        (RunState::Paused, _) => "Paused",
    }
}

/// Mass box caption, e.g. `2.0 kg`
pub fn mass_caption(mass: f64) -> String {
    format!("{:.1} kg", mass)
}

/// The whole readout panel as one block of text
pub fn panel_text(scenario: &Scenario) -> String {
    let r = Readouts::from_scenario(scenario);
    let state = &scenario.state;
    let on_off = |b: bool| if b { "on" } else { "off" };
    let graphs = if scenario.history.is_some() {
        on_off(scenario.overlays.show_graphs)
    } else {
        "n/a"
    };
    format!(
        "a = {} m/s^2   v = {} m/s   T = {} N   t = {} s\n\
         m1 = {}   m2 = {}   v0 = {:.1} m/s\n\
         {}   forces [F]: {}   graphs [G]: {}\n\
         Space start/pause  R reset  Q/A m1  W/S m2  E/D v0",
        r.acceleration,
        r.velocity,
        r.tension,
        r.time,
        mass_caption(state.mass1()),
        mass_caption(state.mass2()),
        state.initial_velocity(),
        status_label(scenario),
        on_off(scenario.overlays.show_forces),
        graphs,
    )
}
