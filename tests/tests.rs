use atwood::configuration::config::{MachineConfig, ParametersConfig, ScenarioConfig, StepModeConfig};
use atwood::simulation::engine::{PauseReason, RunState};
use atwood::simulation::forces::{compute_derived, force_diagram};
use atwood::simulation::history::{RollingBuffer, Sample};
use atwood::simulation::integrator::{euler_step, rope_exhausted};
use atwood::simulation::scenario::{Command, FrameOutcome, Scenario};
use atwood::simulation::states::SimulationState;
use atwood::visualization::controls::command_for_key;
use atwood::visualization::layout::{
    dashed, double_arrow, legend_dial, rotation_indicator, ChartFrame, Layout, ACCELERATION_ARROW,
    VELOCITY_ARROW,
};
use atwood::visualization::readout::{mass_caption, status_label, Readouts};

use bevy::input::keyboard::KeyCode;
use bevy::math::Vec2;

const G: f64 = 9.8;

/// Scenario with the given machine and every other setting at its default
pub fn scenario_with(mass1: f64, mass2: f64, initial_velocity: f64) -> Scenario {
    Scenario::build_scenario(ScenarioConfig {
        machine: MachineConfig {
            mass1,
            mass2,
            initial_velocity,
        },
        ..Default::default()
    })
}

/// Default scenario with one chart sample per physics step
pub fn sampling_every_step() -> Scenario {
    let mut cfg = ScenarioConfig::default();
    cfg.display.sample_interval = 0.0;
    Scenario::build_scenario(cfg)
}

/// Run frames until the rope runs out, returning the frame it happened on
pub fn run_to_exhaustion(scenario: &mut Scenario, cap: u64) -> Option<u64> {
    for frame in 1..=cap {
        if scenario.advance_frame(1.0 / 60.0) == FrameOutcome::Exhausted {
            return Some(frame);
        }
    }
    None
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

// ==================================================================================
// Closed-form dynamics
// ==================================================================================

#[test]
fn derived_matches_textbook_example() {
    let d = compute_derived(2.0, 3.0, G);
    assert!(approx(d.acceleration, 1.96, 1e-12), "a = {}", d.acceleration);
    assert!(approx(d.tension, 23.52, 1e-12), "T = {}", d.tension);
}

#[test]
fn equal_masses_balance() {
    let d = compute_derived(5.0, 5.0, G);
    assert_eq!(d.acceleration, 0.0);
    assert!(approx(d.tension, 49.0, 1e-12), "T = {}", d.tension);
}

#[test]
fn derived_signs_and_bounds_over_mass_grid() {
    let masses = [0.1, 0.5, 1.0, 2.0, 3.3, 5.0, 7.5, 10.0];
    for &m1 in &masses {
        for &m2 in &masses {
            let d = compute_derived(m1, m2, G);

            let expected_a = G * (m2 - m1) / (m1 + m2);
            let expected_t = 2.0 * m1 * m2 * G / (m1 + m2);
            assert!(approx(d.acceleration, expected_a, 1e-12));
            assert!(approx(d.tension, expected_t, 1e-12));

            assert!(d.tension > 0.0, "tension not positive for {m1}, {m2}");
            assert!(d.acceleration.abs() < G, "|a| >= g for {m1}, {m2}");
            if m2 > m1 {
                assert!(d.acceleration > 0.0, "mass2 heavier but a = {}", d.acceleration);
            } else if m2 < m1 {
                assert!(d.acceleration < 0.0, "mass1 heavier but a = {}", d.acceleration);
            }

            // tension sits between the two weights
            let (light, heavy) = if m1 < m2 { (m1, m2) } else { (m2, m1) };
            assert!(d.tension >= light * G - 1e-9 && d.tension <= heavy * G + 1e-9);
        }
    }
}

#[test]
fn force_diagram_net_forces_match_newton() {
    let state = SimulationState::new(2.0, 3.0, G, 0.0);
    let f = force_diagram(&state);

    assert!(approx(f.weight1, 19.6, 1e-12));
    assert!(approx(f.weight2, 29.4, 1e-12));
    assert!(approx(f.net_on_mass2(), 3.0 * state.acceleration(), 1e-9));
    assert!(approx(f.net_on_mass1(), 2.0 * state.acceleration(), 1e-9));
}

#[test]
fn changing_a_mass_recomputes_derived_values() {
    let mut state = SimulationState::new(2.0, 3.0, G, 0.0);
    state.set_mass1(3.0);
    assert_eq!(state.acceleration(), 0.0);
    assert!(approx(state.tension(), 29.4, 1e-12));

    state.set_mass2(1.0);
    let d = compute_derived(3.0, 1.0, G);
    assert_eq!(state.acceleration(), d.acceleration);
    assert_eq!(state.tension(), d.tension);
}

// ==================================================================================
// Integration and rope boundary
// ==================================================================================

#[test]
fn euler_step_updates_velocity_then_position() {
    let mut state = SimulationState::new(2.0, 3.0, G, 1.0);
    euler_step(&mut state, 0.5);

    // v = 1 + 1.96 * 0.5, x = v * 0.5
    assert!(approx(state.velocity, 1.98, 1e-12));
    assert!(approx(state.position, 0.99, 1e-12));
    assert!(approx(state.time, 0.5, 1e-12));
}

#[test]
fn equal_masses_never_move() {
    let mut scenario = scenario_with(5.0, 5.0, 0.0);
    scenario.apply(Command::Start);
    for _ in 0..2_000 {
        scenario.advance_frame(1.0 / 60.0);
    }
    assert_eq!(scenario.state.position, 0.0);
    assert_eq!(scenario.run_state(), RunState::Running);
    assert!(approx(scenario.state.time, 2_000.0 * 0.008, 1e-9));
}

#[test]
fn pauses_on_first_frame_past_the_rope_limit() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);
    let params = scenario.parameters.clone();

    // Reference run: step until the travel first exceeds the limit
    let mut reference = SimulationState::new(2.0, 3.0, G, 0.0);
    let mut expected_frame = 0u64;
    let mut previous = reference.clone();
    while !rope_exhausted(&reference, &params) {
        previous = reference.clone();
        euler_step(&mut reference, params.dt);
        expected_frame += 1;
    }
    assert!(previous.rope_travel(params.pixels_per_meter) <= params.max_rope_travel);

    scenario.apply(Command::Start);
    let frame = run_to_exhaustion(&mut scenario, 10_000).expect("rope never ran out");

    assert_eq!(frame, expected_frame);
    assert_eq!(scenario.state, reference);
    assert_eq!(scenario.run_state(), RunState::Paused);
    assert_eq!(scenario.engine.pause_reason(), Some(PauseReason::RopeExhausted));
}

#[test]
fn no_advance_after_exhaustion_until_reset() {
    let mut scenario = scenario_with(1.0, 10.0, 0.0);
    scenario.apply(Command::Start);
    run_to_exhaustion(&mut scenario, 10_000).expect("rope never ran out");
    let frozen = scenario.state.clone();

    for _ in 0..50 {
        assert_eq!(scenario.advance_frame(1.0 / 60.0), FrameOutcome::Halted);
    }
    assert_eq!(scenario.state, frozen);

    // start and toggle are refused for this run
    scenario.apply(Command::Start);
    scenario.apply(Command::Toggle);
    assert_eq!(scenario.run_state(), RunState::Paused);
    assert_eq!(scenario.advance_frame(1.0 / 60.0), FrameOutcome::Halted);
    assert_eq!(scenario.state, frozen);

    scenario.apply(Command::Reset);
    assert_eq!(scenario.run_state(), RunState::Idle);
    scenario.apply(Command::Start);
    assert_eq!(scenario.advance_frame(1.0 / 60.0), FrameOutcome::Stepped(1));
}

#[test]
fn upward_exhaustion_is_detected_too() {
    // mass1 heavier, so position goes negative
    let mut scenario = scenario_with(10.0, 1.0, 0.0);
    scenario.apply(Command::Start);
    run_to_exhaustion(&mut scenario, 10_000).expect("rope never ran out");
    assert!(scenario.state.position < 0.0);
    assert!(scenario.state.rope_travel(25.0) > 200.0);
}

// ==================================================================================
// Driver state machine
// ==================================================================================

#[test]
fn starts_idle_and_does_not_advance() {
    let mut scenario = scenario_with(2.0, 3.0, 1.5);
    assert_eq!(scenario.run_state(), RunState::Idle);
    assert_eq!(scenario.state.velocity, 1.5);

    assert_eq!(scenario.advance_frame(1.0 / 60.0), FrameOutcome::Halted);
    assert_eq!(scenario.state.time, 0.0);
    assert_eq!(scenario.state.position, 0.0);
}

#[test]
fn start_pause_toggle_transitions() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);

    scenario.apply(Command::Pause);
    assert_eq!(scenario.run_state(), RunState::Idle, "pause while idle changed state");

    scenario.apply(Command::Start);
    assert_eq!(scenario.run_state(), RunState::Running);
    assert!(!scenario.engine.start(), "second start should be a no-op");

    scenario.apply(Command::Toggle);
    assert_eq!(scenario.run_state(), RunState::Paused);
    assert_eq!(scenario.engine.pause_reason(), Some(PauseReason::User));

    scenario.apply(Command::Toggle);
    assert_eq!(scenario.run_state(), RunState::Running);

    scenario.apply(Command::Pause);
    let paused = scenario.state.clone();
    scenario.advance_frame(1.0 / 60.0);
    assert_eq!(scenario.state, paused);
}

#[test]
fn per_frame_mode_ignores_wall_clock() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);
    scenario.apply(Command::Start);

    assert_eq!(scenario.advance_frame(10.0), FrameOutcome::Stepped(1));
    assert_eq!(scenario.advance_frame(0.0), FrameOutcome::Stepped(1));
    assert!(approx(scenario.state.time, 2.0 * 0.008, 1e-12));
}

#[test]
fn real_time_mode_accumulates_frame_time() {
    let mut cfg = ScenarioConfig::default();
    cfg.machine = MachineConfig {
        mass1: 5.0,
        mass2: 5.0,
        initial_velocity: 0.0,
    };
    cfg.parameters = ParametersConfig {
        dt: 0.25,
        step_mode: StepModeConfig::RealTime,
        max_steps_per_frame: 8,
        ..Default::default()
    };
    let mut scenario = Scenario::build_scenario(cfg);
    scenario.apply(Command::Start);

    // 0.625 s = 2.5 steps, half a step carried over
    assert_eq!(scenario.advance_frame(0.625), FrameOutcome::Stepped(2));
    assert_eq!(scenario.advance_frame(0.125), FrameOutcome::Stepped(1));
    assert_eq!(scenario.advance_frame(0.1), FrameOutcome::Stepped(0));

    // a long stall is capped and the backlog dropped
    assert_eq!(scenario.advance_frame(10.0), FrameOutcome::Stepped(8));
    assert_eq!(scenario.advance_frame(0.0), FrameOutcome::Stepped(0));

    assert!(approx(scenario.state.time, 11.0 * 0.25, 1e-12));
}

#[test]
fn real_time_mode_stops_mid_frame_when_rope_runs_out() {
    let mut cfg = ScenarioConfig::default();
    cfg.machine = MachineConfig {
        mass1: 1.0,
        mass2: 10.0,
        initial_velocity: 0.0,
    };
    cfg.parameters = ParametersConfig {
        step_mode: StepModeConfig::RealTime,
        max_steps_per_frame: 8,
        ..Default::default()
    };
    let mut scenario = Scenario::build_scenario(cfg);

    // step a copy one dt at a time up to the first step past the limit
    let mut reference = scenario.state.clone();
    let mut steps = 0u32;
    while !rope_exhausted(&reference, &scenario.parameters) {
        euler_step(&mut reference, scenario.parameters.dt);
        steps += 1;
    }
    assert_ne!(steps % 8, 0, "limit should fall inside a frame");

    // 0.1 s frames always hold more than 8 steps, so every frame runs the cap
    scenario.apply(Command::Start);
    let mut frames = 0;
    let outcome = loop {
        frames += 1;
        match scenario.advance_frame(0.1) {
            FrameOutcome::Stepped(n) => assert_eq!(n, 8),
            other => break other,
        }
    };

    assert_eq!(outcome, FrameOutcome::Exhausted);
    assert_eq!(frames, steps / 8 + 1);
    assert_eq!(scenario.state, reference);
    assert_eq!(scenario.engine.pause_reason(), Some(PauseReason::RopeExhausted));

    let stopped = scenario.state.clone();
    assert_eq!(scenario.advance_frame(0.1), FrameOutcome::Halted);
    assert_eq!(scenario.state, stopped);
}

#[test]
fn reset_is_idempotent() {
    let mut scenario = sampling_every_step();
    scenario.apply(Command::SetInitialVelocity(-1.2));
    scenario.apply(Command::Start);
    for _ in 0..100 {
        scenario.advance_frame(1.0 / 60.0);
    }
    assert!(scenario.state.time > 0.0);

    scenario.apply(Command::Reset);
    let once = scenario.state.clone();
    scenario.apply(Command::Reset);

    assert_eq!(scenario.state, once);
    assert_eq!(scenario.state.position, 0.0);
    assert_eq!(scenario.state.time, 0.0);
    assert_eq!(scenario.state.velocity, -1.2);
    assert_eq!(scenario.run_state(), RunState::Idle);
    assert!(scenario.history.as_ref().is_some_and(|h| h.is_empty()));
}

// ==================================================================================
// Input clamping
// ==================================================================================

#[test]
fn mass_and_velocity_inputs_are_clamped() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);

    scenario.apply(Command::SetMass1(50.0));
    assert_eq!(scenario.state.mass1(), 10.0);
    scenario.apply(Command::SetMass2(0.0));
    assert_eq!(scenario.state.mass2(), 0.1);
    assert!(scenario.state.acceleration() < 0.0);

    scenario.apply(Command::SetInitialVelocity(-9.0));
    assert_eq!(scenario.state.initial_velocity(), -5.0);
    assert_eq!(scenario.state.velocity, -5.0, "initial velocity should apply at once");
}

#[test]
fn non_finite_inputs_keep_previous_value() {
    let mut scenario = scenario_with(2.0, 3.0, 1.0);
    scenario.apply(Command::SetMass1(f64::NAN));
    scenario.apply(Command::SetMass2(f64::INFINITY));
    scenario.apply(Command::SetInitialVelocity(f64::NAN));

    assert_eq!(scenario.state.mass1(), 2.0);
    assert_eq!(scenario.state.mass2(), 3.0);
    assert_eq!(scenario.state.initial_velocity(), 1.0);
}

#[test]
fn configured_values_are_clamped_on_build() {
    let scenario = scenario_with(25.0, 0.01, 12.0);
    assert_eq!(scenario.state.mass1(), 10.0);
    assert_eq!(scenario.state.mass2(), 0.1);
    assert_eq!(scenario.state.initial_velocity(), 5.0);
}

#[test]
fn wider_mass_range_is_respected() {
    let mut cfg = ScenarioConfig::default();
    cfg.limits.mass_max = 20.0;
    let mut scenario = Scenario::build_scenario(cfg);
    scenario.apply(Command::SetMass2(18.0));
    assert_eq!(scenario.state.mass2(), 18.0);
}

// ==================================================================================
// Rolling history
// ==================================================================================

#[test]
fn rolling_buffer_keeps_most_recent_samples() {
    let mut buffer = RollingBuffer::new(200);
    for i in 0..250 {
        buffer.push(Sample {
            time: i as f64,
            velocity: 0.0,
            acceleration: 0.0,
        });
    }

    assert_eq!(buffer.len(), 200);
    let times: Vec<f64> = buffer.iter().map(|s| s.time).collect();
    let expected: Vec<f64> = (50..250).map(|i| i as f64).collect();
    assert_eq!(times, expected);
}

#[test]
fn history_fills_while_running_in_time_order() {
    let mut scenario = sampling_every_step();
    scenario.apply(Command::Start);
    for _ in 0..250 {
        scenario.advance_frame(1.0 / 60.0);
    }

    let history = scenario.history.as_ref().expect("charts enabled by default");
    assert_eq!(history.len(), 200);
    assert!(history.iter().zip(history.iter().skip(1)).all(|(a, b)| a.time < b.time));
    assert_eq!(history.latest().map(|s| s.time), Some(scenario.state.time));
}

#[test]
fn history_sampling_is_throttled() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);
    scenario.apply(Command::Start);
    for _ in 0..100 {
        scenario.advance_frame(1.0 / 60.0);
    }

    let history = scenario.history.as_ref().expect("charts enabled by default");
    let times: Vec<f64> = history.iter().map(|s| s.time).collect();
    assert!(times.len() >= 2 && times.len() < 100, "{} samples", times.len());
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 0.05 - 1e-9, "samples too close: {pair:?}");
    }
}

#[test]
fn disabled_charts_keep_no_history() {
    let mut cfg = ScenarioConfig::default();
    cfg.display.graphs = false;
    let mut scenario = Scenario::build_scenario(cfg);

    assert!(scenario.history.is_none());
    assert!(!scenario.overlays.show_graphs);

    scenario.apply(Command::ToggleGraphs);
    assert!(!scenario.overlays.show_graphs);

    scenario.apply(Command::Start);
    scenario.advance_frame(1.0 / 60.0);
    assert!(scenario.history.is_none());
}

#[test]
fn overlay_toggles_flip() {
    let mut scenario = scenario_with(2.0, 3.0, 0.0);
    let forces = scenario.overlays.show_forces;
    let graphs = scenario.overlays.show_graphs;

    scenario.apply(Command::ToggleForces);
    scenario.apply(Command::ToggleGraphs);
    assert_eq!(scenario.overlays.show_forces, !forces);
    assert_eq!(scenario.overlays.show_graphs, !graphs);
}

// ==================================================================================
// Screen layout
// ==================================================================================

fn test_layout() -> Layout {
    Layout::new(700.0, 600.0, 25.0, true)
}

#[test]
fn masses_hang_under_tangent_points() {
    let layout = test_layout();
    assert_eq!(layout.center_x, 350.0);
    assert_eq!(layout.canvas_width, 1020.0);

    let (m1, m2) = layout.mass_centers(0.0);
    assert_eq!(m1, Vec2::new(315.0, 320.0));
    assert_eq!(m2, Vec2::new(385.0, 320.0));

    // positive travel lowers mass2 and raises mass1
    let (m1, m2) = layout.mass_centers(2.0);
    assert_eq!(m1.y, 270.0);
    assert_eq!(m2.y, 370.0);
}

#[test]
fn pulley_angle_is_arc_length_over_radius() {
    let layout = test_layout();
    assert!((layout.pulley_angle(1.4) - 1.0).abs() < 1e-6);

    let spokes = layout.spoke_ends(0.0);
    assert!((spokes[0] - Vec2::new(377.0, 100.0)).length() < 1e-4);
}

#[test]
fn world_coordinates_are_centred_and_y_up() {
    let layout = test_layout();
    assert_eq!(layout.to_world(Vec2::new(0.0, 0.0)), Vec2::new(-510.0, 300.0));
    assert_eq!(layout.to_world(Vec2::new(510.0, 300.0)), Vec2::ZERO);
}

#[test]
fn arrows_hidden_below_threshold() {
    assert!(double_arrow(0.0, 0.0, 0.04, &VELOCITY_ARROW).is_none());
    assert!(double_arrow(0.0, 0.0, 0.005, &ACCELERATION_ARROW).is_none());
    assert!(double_arrow(0.0, 0.0, 0.02, &ACCELERATION_ARROW).is_some());
}

#[test]
fn arrows_scale_and_point_with_sign() {
    let down = double_arrow(100.0, 200.0, 1.0, &VELOCITY_ARROW).expect("visible arrow");
    assert_eq!(down.shafts[0], (Vec2::new(94.0, 200.0), Vec2::new(94.0, 220.0)));
    assert_eq!(down.shafts[1].0.x, 106.0);
    // head tip at the end, barbs behind it
    assert_eq!(down.heads[0][0], Vec2::new(94.0, 220.0));
    assert!(down.heads[0][1].y < 220.0);

    let up = double_arrow(100.0, 200.0, -2.0, &ACCELERATION_ARROW).expect("visible arrow");
    assert_eq!(up.shafts[0].1.y, 160.0);
    assert!(up.heads[0][1].y > 160.0);
    assert!(up.dashed);
}

#[test]
fn dashes_cover_the_line() {
    let pieces = dashed(Vec2::ZERO, Vec2::new(0.0, 24.0), 7.0, 5.0);
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0], (Vec2::ZERO, Vec2::new(0.0, 7.0)));
    assert_eq!(pieces[1], (Vec2::new(0.0, 12.0), Vec2::new(0.0, 19.0)));
    assert!(dashed(Vec2::ZERO, Vec2::ZERO, 7.0, 5.0).is_empty());
}

#[test]
fn rotation_indicator_follows_velocity_sign() {
    let center = Vec2::new(350.0, 100.0);
    assert!(rotation_indicator(center, 0.01).is_none());

    let (arc, head) = rotation_indicator(center, 1.0).expect("clockwise indicator");
    assert!(arc.iter().all(|p| p.x > center.x), "clockwise arc should sit on the right");
    assert!(head[0].y > center.y, "clockwise arrow should end low");

    let (arc, _) = rotation_indicator(center, -1.0).expect("counter-clockwise indicator");
    assert!(arc.iter().all(|p| p.x < center.x), "counter-clockwise arc should sit on the left");
}

#[test]
fn legend_dial_points_clockwise() {
    let center = Vec2::new(275.0, 570.0);
    let (arc, head) = legend_dial(center);

    let last = arc[arc.len() - 1];
    let before = arc[arc.len() - 2];
    assert_eq!(head[0], last, "arrowhead should sit on the end of the arc");

    // both barbs trail behind the tip
    let travel = last - before;
    for barb in [head[1], head[2]] {
        assert!((barb - last).dot(travel) < 0.0, "barb {barb:?} points the wrong way");
    }
    // clockwise on screen: the arc runs down the right side of the dial
    assert!(arc.iter().all(|p| p.x > center.x));
    assert!(last.y > arc[0].y);
}

#[test]
fn chart_shows_last_window_of_samples() {
    let frame = ChartFrame {
        origin: Vec2::ZERO,
        size: Vec2::new(100.0, 100.0),
        window: 10.0,
    };
    let mut history = RollingBuffer::new(200);
    assert!(frame.plot(&history, |s| s.velocity).is_empty());

    for i in 0..=20 {
        history.push(Sample {
            time: i as f64,
            velocity: i as f64,
            acceleration: 0.0,
        });
    }

    assert_eq!(frame.time_span(20.0), (10.0, 20.0));
    assert_eq!(frame.time_span(3.0), (0.0, 10.0));

    let points = frame.plot(&history, |s| s.velocity);
    assert_eq!(points.len(), 11);
    assert_eq!(points[0], Vec2::new(0.0, 25.0));
    assert_eq!(points[10], Vec2::new(100.0, 0.0));

    // flat zero series stays on the axis
    let flat = frame.plot(&history, |s| s.acceleration);
    assert!(flat.iter().all(|p| p.y == 50.0));
}

#[test]
fn short_canvas_collapses_charts_instead_of_flipping_them() {
    let layout = Layout::new(700.0, 100.0, 25.0, true);
    let [velocity, acceleration] = layout.chart_frames(10.0).expect("chart panel present");
    assert_eq!(velocity.size.y, 0.0);
    assert_eq!(acceleration.size.y, 0.0);
    assert!(acceleration.origin.y >= velocity.origin.y);
}

#[test]
fn no_chart_frames_without_chart_panel() {
    let layout = Layout::new(700.0, 600.0, 25.0, false);
    assert_eq!(layout.canvas_width, 700.0);
    assert!(layout.chart_frames(10.0).is_none());
    assert!(test_layout().chart_frames(10.0).is_some());
}

// ==================================================================================
// Controls and readouts
// ==================================================================================

#[test]
fn keys_map_to_commands() {
    let scenario = scenario_with(2.0, 3.0, 0.0);

    assert_eq!(command_for_key(KeyCode::Space, &scenario), Some(Command::Toggle));
    assert_eq!(command_for_key(KeyCode::KeyR, &scenario), Some(Command::Reset));
    assert_eq!(command_for_key(KeyCode::KeyG, &scenario), Some(Command::ToggleGraphs));
    assert_eq!(command_for_key(KeyCode::KeyZ, &scenario), None);

    match command_for_key(KeyCode::KeyQ, &scenario) {
        Some(Command::SetMass1(m)) => assert!(approx(m, 2.1, 1e-12)),
        other => panic!("unexpected {other:?}"),
    }
    match command_for_key(KeyCode::KeyD, &scenario) {
        Some(Command::SetInitialVelocity(v)) => assert!(approx(v, -0.1, 1e-12)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn readouts_use_two_decimals() {
    let scenario = scenario_with(2.0, 3.0, 0.0);
    let r = Readouts::from_scenario(&scenario);

    assert_eq!(r.acceleration, "1.96");
    assert_eq!(r.tension, "23.52");
    assert_eq!(r.velocity, "0.00");
    assert_eq!(r.time, "0.00");
    assert_eq!(mass_caption(2.0), "2.0 kg");
    assert_eq!(status_label(&scenario), "Ready");
}

// ==================================================================================
// Scenario files
// ==================================================================================

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let yaml = r#"
machine:
  mass1: 4.0
parameters:
  step_mode: "real_time"
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("valid yaml");
    cfg.validate().expect("valid scenario");

    assert_eq!(cfg.machine.mass1, 4.0);
    assert_eq!(cfg.machine.mass2, 3.0);
    assert_eq!(cfg.parameters.step_mode, StepModeConfig::RealTime);
    assert_eq!(cfg.parameters.dt, 0.008);
    assert_eq!(cfg.limits.mass_max, 10.0);
    assert!(cfg.display.graphs);
}

#[test]
fn unknown_step_mode_is_rejected() {
    let yaml = "parameters:\n  step_mode: \"warp\"\n";
    assert!(serde_yaml::from_str::<ScenarioConfig>(yaml).is_err());
}

#[test]
fn invalid_parameters_fail_validation() {
    let mut cfg = ScenarioConfig::default();
    cfg.parameters.dt = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ScenarioConfig::default();
    cfg.limits.mass_min = 5.0;
    cfg.limits.mass_max = 1.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ScenarioConfig::default();
    cfg.parameters.max_rope_travel = -1.0;
    assert!(cfg.validate().is_err());

    assert!(ScenarioConfig::default().validate().is_ok());
}

#[test]
fn infinite_scales_fail_validation() {
    let yaml = "parameters:\n  max_rope_travel: .inf\n";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("valid yaml");
    assert!(cfg.validate().is_err());

    let yaml = "parameters:\n  pixels_per_meter: .inf\n";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("valid yaml");
    assert!(cfg.validate().is_err());
}

#[test]
fn window_too_short_for_charts_fails_validation() {
    let mut cfg = ScenarioConfig::default();
    cfg.display.height = 120.0;
    assert!(cfg.validate().is_err());

    cfg.display.height = 250.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn unvalidated_limits_do_not_panic() {
    let mut cfg = ScenarioConfig::default();
    cfg.limits.mass_min = 5.0;
    cfg.limits.mass_max = 1.0;
    cfg.limits.velocity_max = f64::NAN;
    assert!(cfg.validate().is_err());

    let mut scenario = Scenario::build_scenario(cfg);
    assert_eq!(scenario.state.mass1(), 1.0);
    assert_eq!(scenario.state.mass2(), 1.0);
    assert_eq!(scenario.state.initial_velocity(), 0.0);

    scenario.apply(Command::SetMass1(3.0));
    scenario.apply(Command::SetInitialVelocity(2.0));
    assert_eq!(scenario.state.mass1(), 1.0);
    assert!(scenario.state.initial_velocity().is_finite());
}

#[test]
fn shipped_scenarios_parse_and_validate() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["default.yaml", "balanced.yaml", "wide_range_real_time.yaml"] {
        let text = std::fs::read_to_string(dir.join(name)).expect("scenario file present");
        let cfg: ScenarioConfig = serde_yaml::from_str(&text).expect("scenario parses");
        cfg.validate().expect("scenario validates");
    }
}
