//! Core state type for the Atwood machine.
//!
//! The machine has a single degree of freedom: `position` is how far mass2
//! has travelled from its release point (positive = down, which turns the
//! pulley clockwise). mass1 always moves by the same amount the other way.
//!
//! Acceleration and tension depend only on the masses and gravity, so the
//! masses are private and every setter recomputes the derived values.

use crate::simulation::forces::{compute_derived, Derived};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    mass1: f64,                // left mass (kg)
    mass2: f64,                // right mass (kg)
    gravity: f64,              // g (m/s²)
    initial_velocity: f64,     // velocity seeded on reset (m/s)
    acceleration: f64,         // derived (m/s²)
    tension: f64,              // derived (N)
    pub velocity: f64,         // m/s, positive = clockwise
    pub position: f64,         // metres of mass2 travel from release
    pub time: f64,             // elapsed simulated time (s)
}

impl SimulationState {
    pub fn new(mass1: f64, mass2: f64, gravity: f64, initial_velocity: f64) -> Self {
        let Derived { acceleration, tension } = compute_derived(mass1, mass2, gravity);
        Self {
            mass1,
            mass2,
            gravity,
            initial_velocity,
            acceleration,
            tension,
            velocity: initial_velocity,
            position: 0.0,
            time: 0.0,
        }
    }

    pub fn mass1(&self) -> f64 {
        self.mass1
    }

    pub fn mass2(&self) -> f64 {
        self.mass2
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn initial_velocity(&self) -> f64 {
        self.initial_velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    pub fn set_mass1(&mut self, mass: f64) {
        self.mass1 = mass;
        self.recompute();
    }

    pub fn set_mass2(&mut self, mass: f64) {
        self.mass2 = mass;
        self.recompute();
    }

    /// Changes the release velocity and applies it to the current velocity
    /// straight away, so the arrows reflect it before the run starts.
    pub fn set_initial_velocity(&mut self, velocity: f64) {
        self.initial_velocity = velocity;
        self.velocity = velocity;
    }

    /// Back to the release point: position and time zeroed, velocity
    /// re-seeded. Calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.time = 0.0;
        self.velocity = self.initial_velocity;
        self.recompute();
    }

    /// Rope travel in screen pixels, compared against the rope limit
    pub fn rope_travel(&self, pixels_per_meter: f64) -> f64 {
        self.position.abs() * pixels_per_meter
    }

    fn recompute(&mut self) {
        let derived = compute_derived(self.mass1, self.mass2, self.gravity);
        self.acceleration = derived.acceleration;
        self.tension = derived.tension;
    }
}
