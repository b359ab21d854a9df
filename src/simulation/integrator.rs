//! Fixed-step time integration for the Atwood machine
//!
//! Acceleration is constant between boundary events, so plain explicit Euler
//! is all the motion needs.

use super::params::Parameters;
use super::states::SimulationState;

/// Advance the state by one step of `dt`, updating velocity, position and
/// time in place.
pub fn euler_step(state: &mut SimulationState, dt: f64) {
    // v_n+1 = v_n + a dt
    state.velocity += state.acceleration() * dt;

    // x_n+1 = x_n + v_n+1 dt
    state.position += state.velocity * dt;

    state.time += dt;
}

/// True once the rope has run out in either direction. This ends the run:
/// the caller stops stepping, it does not clamp or bounce.
pub fn rope_exhausted(state: &SimulationState, params: &Parameters) -> bool {
    state.rope_travel(params.pixels_per_meter) > params.max_rope_travel
}
