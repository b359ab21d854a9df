//! Build a fully-initialized Atwood scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - driver state (`Engine`)
//! - numerical parameters (`Parameters`) and input ranges (`InputLimits`)
//! - machine state (`SimulationState` at t = 0)
//! - chart history (`RollingBuffer`), absent when charts are disabled
//! - overlay toggles
//!
//! The scenario is inserted into Bevy as a `Resource`. Input systems feed it
//! `Command`s and the physics system calls `advance_frame` once per frame.

use bevy::log::{info, warn};
use bevy::prelude::Resource;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::{Engine, RunState};
use crate::simulation::history::{RollingBuffer, Sample, HISTORY_CAPACITY};
use crate::simulation::integrator::{euler_step, rope_exhausted};
use crate::simulation::params::{InputLimits, Parameters};
use crate::simulation::states::SimulationState;

/// Something the user asked for between two frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    SetMass1(f64),
    SetMass2(f64),
    SetInitialVelocity(f64),
    ToggleForces,
    ToggleGraphs,
}

/// What a call to `advance_frame` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Halted, // not running, nothing advanced
    Stepped(u32), // this many fixed steps
    Exhausted, // the rope ran out during this frame, now paused
}

/// Which overlays are currently drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlays {
    pub show_forces: bool,
    pub show_graphs: bool,
}

/// Bevy resource representing a fully-initialized Atwood machine scenario
#[derive(Resource, Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub limits: InputLimits,
    pub state: SimulationState,
    pub history: Option<RollingBuffer>,
    pub overlays: Overlays,
    pub sample_interval: f64, // simulated seconds between chart samples
    next_sample_at: f64,
}

impl Scenario {
    /// Build the runtime scenario. Run `ScenarioConfig::validate` first;
    /// an unvalidated config never panics here, but an inverted limit range
    /// pins every input to its upper bound.
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Limits first, the configured machine is clamped into them
        let l_cfg = cfg.limits;
        let limits = InputLimits {
            mass_min: l_cfg.mass_min,
            mass_max: l_cfg.mass_max,
            velocity_min: l_cfg.velocity_min,
            velocity_max: l_cfg.velocity_max,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            g: p_cfg.g,
            dt: p_cfg.dt,
            pixels_per_meter: p_cfg.pixels_per_meter,
            max_rope_travel: p_cfg.max_rope_travel,
        };

        // Engine (runtime) from ParametersConfig
        let engine = Engine::new(p_cfg.step_mode, p_cfg.max_steps_per_frame);

        // Initial machine state at t = 0
        let m_cfg = cfg.machine;
        let default_mass = limits.mass_min;
        let mass1 = clamp_logged("mass1", m_cfg.mass1, limits.clamp_mass(m_cfg.mass1, default_mass));
        let mass2 = clamp_logged("mass2", m_cfg.mass2, limits.clamp_mass(m_cfg.mass2, default_mass));
        let initial_velocity = clamp_logged(
            "initial_velocity",
            m_cfg.initial_velocity,
            limits.clamp_velocity(m_cfg.initial_velocity, 0.0),
        );
        let state = SimulationState::new(mass1, mass2, parameters.g, initial_velocity);

        // No chart surface means no history either
        let d_cfg = cfg.display;
        let history = d_cfg.graphs.then(|| RollingBuffer::new(HISTORY_CAPACITY));
        let overlays = Overlays {
            show_forces: d_cfg.show_forces,
            show_graphs: d_cfg.graphs && d_cfg.show_graphs,
        };

        Self {
            engine,
            parameters,
            limits,
            state,
            history,
            overlays,
            sample_interval: d_cfg.sample_interval.max(0.0),
            next_sample_at: 0.0,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.engine.run_state()
    }

    /// Apply one user command. Commands only ever run between frames.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                self.engine.start();
            }
            Command::Pause => {
                self.engine.pause();
            }
            Command::Toggle => {
                if self.engine.is_running() {
                    self.engine.pause();
                } else {
                    self.engine.start();
                }
            }
            Command::Reset => self.reset(),
            Command::SetMass1(mass) => {
                let mass = self.limits.clamp_mass(mass, self.state.mass1());
                self.state.set_mass1(mass);
            }
            Command::SetMass2(mass) => {
                let mass = self.limits.clamp_mass(mass, self.state.mass2());
                self.state.set_mass2(mass);
            }
            Command::SetInitialVelocity(velocity) => {
                let velocity = self.limits.clamp_velocity(velocity, self.state.initial_velocity());
                self.state.set_initial_velocity(velocity);
            }
            Command::ToggleForces => {
                self.overlays.show_forces = !self.overlays.show_forces;
            }
            Command::ToggleGraphs => {
                // nothing to toggle without a chart surface
                if self.history.is_some() {
                    self.overlays.show_graphs = !self.overlays.show_graphs;
                }
            }
        }
    }

    /// Pause, then return to the release point with a fresh history
    pub fn reset(&mut self) {
        self.engine.reset();
        self.state.reset();
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }
        self.next_sample_at = 0.0;
    }

    /// Advance the machine for one displayed frame that took `frame_dt`
    /// seconds of wall-clock time.
    pub fn advance_frame(&mut self, frame_dt: f64) -> FrameOutcome {
        let dt = self.parameters.dt;
        let steps = self.engine.steps_for_frame(frame_dt, dt);
        if !self.engine.is_running() {
            return FrameOutcome::Halted;
        }

        for _ in 0..steps {
            euler_step(&mut self.state, dt);
            self.record_sample();

            if rope_exhausted(&self.state, &self.parameters) {
                self.engine.exhaust();
                info!(
                    "rope exhausted at t = {:.3} s, position = {:.3} m",
                    self.state.time, self.state.position
                );
                return FrameOutcome::Exhausted;
            }
        }
        FrameOutcome::Stepped(steps)
    }

    fn record_sample(&mut self) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        // small slack so float drift in `time` doesn't skip a sample
        if self.state.time + 1e-9 < self.next_sample_at {
            return;
        }
        history.push(Sample {
            time: self.state.time,
            velocity: self.state.velocity,
            acceleration: self.state.acceleration(),
        });
        self.next_sample_at = self.state.time + self.sample_interval;
    }
}

fn clamp_logged(name: &str, requested: f64, clamped: f64) -> f64 {
    if requested != clamped {
        warn!("{name} = {requested} is out of range, using {clamped}");
    }
    clamped
}
