//! Configuration types for loading Atwood machine scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`MachineConfig`]    – the two masses and the initial velocity at release
//! - [`ParametersConfig`] – gravity, step size, scale and rope travel limit
//! - [`LimitsConfig`]     – ranges that user inputs are clamped into
//! - [`DisplayConfig`]    – window size and which overlays start enabled
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! Every field has a default, so any subset is a valid scenario:
//!
//! ```yaml
//! machine:
//!   mass1: 2.0              # kg, left side
//!   mass2: 3.0              # kg, right side
//!   initial_velocity: 0.0   # m/s, positive = clockwise = mass2 down
//!
//! parameters:
//!   g: 9.8                  # gravitational acceleration
//!   dt: 0.008               # fixed step size (s)
//!   pixels_per_meter: 25.0
//!   max_rope_travel: 200.0  # px of travel before the rope runs out
//!   step_mode: "per_frame"  # or "real_time"
//!   max_steps_per_frame: 8  # real_time only
//!
//! limits:
//!   mass_min: 0.1
//!   mass_max: 10.0
//!   velocity_min: -5.0
//!   velocity_max: 5.0
//!
//! display:
//!   width: 700.0
//!   height: 600.0
//!   show_forces: false
//!   graphs: true            # false -> no chart surface at all
//!   show_graphs: true
//!   chart_window: 10.0      # visible seconds
//!   sample_interval: 0.05   # simulated seconds between chart samples
//! ```

use anyhow::{ensure, Result};
use serde::Deserialize;

/// Smallest window that still leaves room for both chart panels
pub const MIN_DISPLAY_HEIGHT: f32 = 250.0;

/// How the animation driver turns displayed frames into physics steps
/// `step_mode: "per_frame"` or `step_mode: "real_time"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepModeConfig {
    #[default]
    #[serde(rename = "per_frame")] // One fixed step per frame, speed follows the display refresh rate
    PerFrame,

    #[serde(rename = "real_time")] // Accumulate wall-clock frame time and run as many fixed steps as fit
    RealTime,
}

/// The physical machine at release
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MachineConfig {
    pub mass1: f64,            // left mass (kg)
    pub mass2: f64,            // right mass (kg)
    pub initial_velocity: f64, // velocity seeded on reset (m/s)
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            mass1: 2.0,
            mass2: 3.0,
            initial_velocity: 0.0,
        }
    }
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub g: f64,                      // gravitational acceleration (m/s²)
    pub dt: f64,                     // fixed step size (s)
    pub pixels_per_meter: f64,       // screen scale
    pub max_rope_travel: f64,        // rope travel limit in pixels
    pub step_mode: StepModeConfig,   // frame to step mapping
    pub max_steps_per_frame: u32,    // cap for real_time catch-up
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            g: 9.8,
            dt: 0.008,
            pixels_per_meter: 25.0,
            max_rope_travel: 200.0,
            step_mode: StepModeConfig::PerFrame,
            max_steps_per_frame: 8,
        }
    }
}

/// Ranges that mass and velocity inputs are clamped into
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub mass_min: f64,
    pub mass_max: f64,
    pub velocity_min: f64,
    pub velocity_max: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            mass_min: 0.1,
            mass_max: 10.0,
            velocity_min: -5.0,
            velocity_max: 5.0,
        }
    }
}

/// Window and overlay settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f32,           // machine area width (px)
    pub height: f32,          // window height (px)
    pub show_forces: bool,    // force diagrams visible at startup
    pub graphs: bool,         // whether a chart surface exists at all
    pub show_graphs: bool,    // charts visible at startup
    pub chart_window: f64,    // visible time span of the charts (s)
    pub sample_interval: f64, // simulated seconds between chart samples, 0 = every step
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 600.0,
            show_forces: false,
            graphs: true,
            show_graphs: true,
            chart_window: 10.0,
            sample_interval: 0.05,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub machine: MachineConfig,       // masses and initial velocity
    pub parameters: ParametersConfig, // numerical and physical parameters
    pub limits: LimitsConfig,         // input clamping ranges
    pub display: DisplayConfig,       // window and overlays
}

impl ScenarioConfig {
    /// Reject parameters the simulation cannot run with.
    /// Masses and velocities are not checked here, they get clamped when the
    /// scenario is built.
    pub fn validate(&self) -> Result<()> {
        let p = &self.parameters;
        ensure!(p.g.is_finite(), "g must be finite, got {}", p.g);
        ensure!(p.dt > 0.0 && p.dt.is_finite(), "dt must be positive, got {}", p.dt);
        ensure!(
            p.pixels_per_meter > 0.0 && p.pixels_per_meter.is_finite(),
            "pixels_per_meter must be positive and finite, got {}",
            p.pixels_per_meter
        );
        ensure!(
            p.max_rope_travel > 0.0 && p.max_rope_travel.is_finite(),
            "max_rope_travel must be positive and finite, got {}",
            p.max_rope_travel
        );
        ensure!(p.max_steps_per_frame >= 1, "max_steps_per_frame must be at least 1");

        let l = &self.limits;
        ensure!(l.mass_min > 0.0, "mass_min must be positive, got {}", l.mass_min);
        ensure!(l.mass_min <= l.mass_max, "mass range is empty: [{}, {}]", l.mass_min, l.mass_max);
        ensure!(
            l.velocity_min <= l.velocity_max,
            "velocity range is empty: [{}, {}]",
            l.velocity_min,
            l.velocity_max
        );

        let d = &self.display;
        ensure!(d.width > 0.0, "display width must be positive, got {}", d.width);
        ensure!(
            d.height >= MIN_DISPLAY_HEIGHT,
            "display height must be at least {} px to fit the charts, got {}",
            MIN_DISPLAY_HEIGHT,
            d.height
        );
        ensure!(d.chart_window > 0.0, "chart_window must be positive, got {}", d.chart_window);
        ensure!(d.sample_interval >= 0.0, "sample_interval must not be negative");

        Ok(())
    }
}
