//! Closed-form dynamics of the ideal Atwood machine
//!
//! Massless rope, massless frictionless pulley: both masses share one
//! acceleration magnitude and the tension is equal on both sides.

use crate::simulation::states::SimulationState;

/// Values that follow directly from the masses and gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub acceleration: f64, // m/s², positive = mass2 descends
    pub tension: f64,      // N
}

/// Acceleration and tension for masses `mass1` (left) and `mass2` (right).
/// Total for `mass1 + mass2 > 0`, which input clamping guarantees.
pub fn compute_derived(mass1: f64, mass2: f64, g: f64) -> Derived {
    let total = mass1 + mass2;

    // a = g (m2 - m1) / (m1 + m2)
    let acceleration = g * (mass2 - mass1) / total;

    // T = 2 m1 m2 g / (m1 + m2)
    let tension = 2.0 * mass1 * mass2 * g / total;

    Derived { acceleration, tension }
}

/// Magnitudes of the forces acting on each mass, for the force diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceDiagram {
    pub weight1: f64, // m1 g, downward on mass1
    pub weight2: f64, // m2 g, downward on mass2
    pub tension: f64, // upward on both masses
}

impl ForceDiagram {
    /// Net downward force on mass2, equals m2 a
    pub fn net_on_mass2(&self) -> f64 {
        self.weight2 - self.tension
    }

    /// Net upward force on mass1, equals m1 a
    pub fn net_on_mass1(&self) -> f64 {
        self.tension - self.weight1
    }
}

pub fn force_diagram(state: &SimulationState) -> ForceDiagram {
    ForceDiagram {
        weight1: state.mass1() * state.gravity(),
        weight2: state.mass2() * state.gravity(),
        tension: state.tension(),
    }
}
