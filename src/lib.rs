pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::SimulationState;
pub use simulation::params::{Parameters, InputLimits};
pub use simulation::forces::{compute_derived, force_diagram, Derived, ForceDiagram};
pub use simulation::integrator::{euler_step, rope_exhausted};
pub use simulation::engine::{Engine, RunState, PauseReason};
pub use simulation::history::{RollingBuffer, Sample, HISTORY_CAPACITY};
pub use simulation::scenario::{Scenario, Command, FrameOutcome, Overlays};

pub use configuration::config::{ScenarioConfig, MachineConfig, ParametersConfig, LimitsConfig, DisplayConfig, StepModeConfig};

pub use visualization::atwood_vis2d::{run_2d, View};
pub use visualization::headless::run_headless;

pub use benchmark::benchmark::bench_runs;
