//! Keyboard bindings
//!
//! Space = start/pause, R = reset, Q/A and W/S nudge the masses, E/D nudge
//! the initial velocity, F and G toggle force diagrams and charts.

use bevy::input::keyboard::KeyCode;

use crate::simulation::scenario::{Command, Scenario};

pub const MASS_NUDGE: f64 = 0.1;
pub const VELOCITY_NUDGE: f64 = 0.1;

/// Command for a freshly pressed key, if it is bound. Nudges are turned into
/// absolute values here so the scenario only ever sees `Set*` commands.
pub fn command_for_key(key: KeyCode, scenario: &Scenario) -> Option<Command> {
    let state = &scenario.state;
    let command = match key {
        KeyCode::Space => Command::Toggle,
        KeyCode::KeyR => Command::Reset,
        KeyCode::KeyQ => Command::SetMass1(state.mass1() + MASS_NUDGE),
        KeyCode::KeyA => Command::SetMass1(state.mass1() - MASS_NUDGE),
        KeyCode::KeyW => Command::SetMass2(state.mass2() + MASS_NUDGE),
        KeyCode::KeyS => Command::SetMass2(state.mass2() - MASS_NUDGE),
        KeyCode::KeyE => Command::SetInitialVelocity(state.initial_velocity() + VELOCITY_NUDGE),
        KeyCode::KeyD => Command::SetInitialVelocity(state.initial_velocity() - VELOCITY_NUDGE),
        KeyCode::KeyF => Command::ToggleForces,
        KeyCode::KeyG => Command::ToggleGraphs,
        _ => return None,
    };
    Some(command)
}
