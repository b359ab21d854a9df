//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravity, fixed step size and screen scale,
//! - the rope travel limit that ends a run,
//!
//! `InputLimits` holds the ranges user inputs are clamped into

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64, // gravitational acceleration
    pub dt: f64, // step size
    pub pixels_per_meter: f64, // screen scale
    pub max_rope_travel: f64, // rope travel limit in pixels
}

#[derive(Debug, Clone)]
pub struct InputLimits {
    pub mass_min: f64,
    pub mass_max: f64,
    pub velocity_min: f64,
    pub velocity_max: f64,
}

impl InputLimits {
    /// Clamp a mass input into range. Non-finite input keeps `current`.
    pub fn clamp_mass(&self, value: f64, current: f64) -> f64 {
        clamp_or_keep(value, current, self.mass_min, self.mass_max)
    }

    /// Clamp an initial velocity input into range. Non-finite input keeps `current`.
    pub fn clamp_velocity(&self, value: f64, current: f64) -> f64 {
        clamp_or_keep(value, current, self.velocity_min, self.velocity_max)
    }
}

// must not panic on an unvalidated range, an inverted one resolves to `max`
fn clamp_or_keep(value: f64, current: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.max(min).min(max)
    } else {
        current
    }
}
