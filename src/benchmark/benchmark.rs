use std::time::Instant;

use crate::configuration::config::{MachineConfig, ScenarioConfig};
use crate::simulation::scenario::{Command, FrameOutcome, Scenario};

/// Runs stop after this many frames even if the rope never runs out
const FRAME_CAP: u64 = 200_000;

/// Nominal display frame time, only matters for real_time stepping
const FRAME_DT: f64 = 1.0 / 120.0;

/// Run a grid of mass pairs from release to rope exhaustion without a window
/// and print how many frames, how much simulated time and how much wall
/// time each run took.
pub fn bench_runs() {
    // (m1, m2, v0)
    let cases = [
        (2.0, 3.0, 0.0),
        (1.0, 10.0, 0.0),
        (0.1, 10.0, 0.0),
        (5.0, 5.5, 0.0),
        (9.9, 10.0, 0.0),
        (5.0, 5.0, 0.5),
        (3.0, 2.0, 5.0),
    ];

    println!("{:>6} {:>6} {:>6} | {:>8} {:>10} {:>10} {:>12}", "m1", "m2", "v0", "a", "frames", "sim t (s)", "wall (ms)");

    for (m1, m2, v0) in cases {
        let cfg = ScenarioConfig {
            machine: MachineConfig {
                mass1: m1,
                mass2: m2,
                initial_velocity: v0,
            },
            ..Default::default()
        };
        let mut scenario = Scenario::build_scenario(cfg);
        scenario.apply(Command::Start);

        let t0 = Instant::now();
        let mut frames = 0u64;
        let mut exhausted = false;
        while frames < FRAME_CAP {
            frames += 1;
            if scenario.advance_frame(FRAME_DT) == FrameOutcome::Exhausted {
                exhausted = true;
                break;
            }
        }
        let wall = t0.elapsed().as_secs_f64() * 1e3;

        let marker = if exhausted { "" } else { " (capped)" };
        println!(
            "{:6.1} {:6.1} {:6.1} | {:8.3} {:>10} {:10.3} {:12.3}{}",
            m1,
            m2,
            v0,
            scenario.state.acceleration(),
            frames,
            scenario.state.time,
            wall,
            marker
        );
    }
}
