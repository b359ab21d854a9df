//! Animation driver state machine
//!
//! Tracks whether the machine is Idle, Running or Paused and decides how
//! many fixed physics steps a displayed frame gets. It never touches the
//! physics state itself, `Scenario` owns both and wires them together.

use bevy::log::{debug, info};

use crate::configuration::config::StepModeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle, // initial or just reset, time is not advancing
    Running, // one or more steps per frame
    Paused, // by the user or because the rope ran out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    User,
    RopeExhausted,
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub step_mode: StepModeConfig, // per_frame or real_time
    pub max_steps_per_frame: u32, // real_time catch-up cap
    run_state: RunState,
    pause_reason: Option<PauseReason>,
    accumulator: f64, // unspent wall-clock time, real_time only
}

impl Engine {
    pub fn new(step_mode: StepModeConfig, max_steps_per_frame: u32) -> Self {
        Self {
            step_mode,
            max_steps_per_frame: max_steps_per_frame.max(1),
            run_state: RunState::Idle,
            pause_reason: None,
            accumulator: 0.0,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn pause_reason(&self) -> Option<PauseReason> {
        self.pause_reason
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// The rope ran out during this run, only a reset clears it
    pub fn is_exhausted(&self) -> bool {
        self.pause_reason == Some(PauseReason::RopeExhausted)
    }

    /// Idle/Paused -> Running. Returns false when nothing changed: already
    /// running, or the run ended on rope exhaustion.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        if self.is_exhausted() {
            info!("start ignored: rope exhausted, reset first");
            return false;
        }
        self.run_state = RunState::Running;
        self.pause_reason = None;
        info!("running");
        true
    }

    /// Running -> Paused by user action. Pausing twice is harmless.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.run_state = RunState::Paused;
        self.pause_reason = Some(PauseReason::User);
        self.accumulator = 0.0;
        info!("paused");
        true
    }

    /// Running -> Paused because the rope ran out
    pub fn exhaust(&mut self) {
        self.run_state = RunState::Paused;
        self.pause_reason = Some(PauseReason::RopeExhausted);
        self.accumulator = 0.0;
    }

    /// Any -> Idle
    pub fn reset(&mut self) {
        self.run_state = RunState::Idle;
        self.pause_reason = None;
        self.accumulator = 0.0;
        debug!("engine reset");
    }

    /// Number of fixed `dt` steps to run for a frame that took `frame_dt`
    /// seconds of wall-clock time. Zero unless running.
    pub fn steps_for_frame(&mut self, frame_dt: f64, dt: f64) -> u32 {
        if !self.is_running() {
            return 0;
        }
        match self.step_mode {
            StepModeConfig::PerFrame => 1,
            StepModeConfig::RealTime => {
                if frame_dt.is_finite() && frame_dt > 0.0 {
                    self.accumulator += frame_dt;
                }
                let available = (self.accumulator / dt).floor();
                let steps = available.min(self.max_steps_per_frame as f64) as u32;
                self.accumulator -= steps as f64 * dt;

                // a long stall (window drag, breakpoint) is dropped, not replayed
                if steps == self.max_steps_per_frame && self.accumulator >= dt {
                    self.accumulator = 0.0;
                }
                steps
            }
        }
    }
}
