pub mod analyzer;
pub mod body;
pub mod burn;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod kinematics;
pub mod predictor;
pub mod runtime;
pub mod vector;

pub use analyzer::analyze_scenario;
pub use body::{Body, BodyId, DEFAULT_MAX_THRUST};
pub use burn::{Burn, BurnSchedule};
pub use config::{BodyConfig, BurnConfig, ConfigError, ForecastConfig, ScenarioConfig, UniverseConfig};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use engine::{World, WorldError, WorldSnapshot, DEFAULT_G, DEFAULT_R_POWER, SINGULARITY_DISTANCE};
pub use kinematics::Kinematics;
pub use predictor::{
    fast_forward, predict, BodyForecast, Forecast, ForecastRequest, PredictError,
    DEFAULT_STEP_SIZE,
};
pub use runtime::{
    build_simulation_context, build_simulation_context_from_source, build_world,
    get_body_states, nearest_sample, BodyState, ControlError, SimulationContext,
};
pub use vector::{Vector, VectorExt};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
