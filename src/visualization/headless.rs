//! Windowless driver
//!
//! Runs the same per-frame physics system as the 2D viewer on Bevy's
//! minimal plugin set, starts the machine immediately and logs readouts
//! until the rope runs out or the frame budget is spent.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::simulation::scenario::{Command, Scenario};
use crate::visualization::atwood_vis2d::physics_step_system;
use crate::visualization::readout::{status_label, Readouts};

/// Frames between two log lines
const REPORT_EVERY: u64 = 60;

/// Display refresh the headless loop pretends to run at
const FRAME_RATE: f64 = 120.0;

#[derive(Resource, Debug, Clone, Copy)]
struct FrameBudget(u64);

pub fn run_headless(scenario: Scenario, max_frames: u64) {
    App::new()
        .insert_resource(scenario)
        .insert_resource(FrameBudget(max_frames))
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / FRAME_RATE))),
            LogPlugin::default(),
        ))
        .add_systems(Startup, start_system)
        .add_systems(Update, (physics_step_system, report_system).chain())
        .run();
}

fn start_system(mut scenario: ResMut<Scenario>) {
    let state = &scenario.state;
    info!(
        "headless run: m1 = {:.1} kg, m2 = {:.1} kg, v0 = {:.1} m/s, a = {:.2} m/s², T = {:.2} N",
        state.mass1(),
        state.mass2(),
        state.initial_velocity(),
        state.acceleration(),
        state.tension()
    );
    scenario.apply(Command::Start);
}

fn report_system(
    scenario: Res<Scenario>,
    budget: Res<FrameBudget>,
    mut frames: Local<u64>,
    mut exit: EventWriter<AppExit>,
) {
    *frames += 1;

    let finished = !scenario.engine.is_running();
    let out_of_budget = *frames >= budget.0;

    if *frames % REPORT_EVERY == 0 || finished || out_of_budget {
        let r = Readouts::from_scenario(&scenario);
        info!(
            "frame {:6}  t = {} s  v = {} m/s  a = {} m/s²  T = {} N  x = {:.3} m",
            *frames, r.time, r.velocity, r.acceleration, r.tension, scenario.state.position
        );
    }

    if finished {
        info!("{}", status_label(&scenario));
        exit.send(AppExit::Success);
    } else if out_of_budget {
        info!("frame budget of {} reached", budget.0);
        exit.send(AppExit::Success);
    }
}
