use crate::analyzer::analyze_scenario;
use crate::body::{Body, BodyId};
use crate::burn::Burn;
use crate::config::{ConfigError, ScenarioConfig, DEFAULT_SAMPLES, DEFAULT_SPACING};
use crate::diagnostics::Diagnostics;
use crate::engine::{World, WorldError};
use crate::predictor::{Forecast, ForecastRequest, PredictError};
use glam::DVec2;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from controller operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error("no body is selected")]
    NoSelection,
    #[error("selected body {0} is massive and has no forecast path to burn along")]
    MassiveSelection(BodyId),
    #[error("sample index {index} is out of range for {len} samples")]
    SampleIndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Read-only view of a body for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub id: BodyId,
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Heading in radians, y axis pointing down
    pub heading: f64,
    pub heading_deg: f64,
    pub thrust: f64,
    pub massive: bool,
    pub pending_burns: usize,
}

/// Live simulation driven by a controller: world, clock and selection
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub world: World,
    /// Largest physics sub-step, in simulation seconds
    pub step_size: f64,
    /// Simulation seconds per wall-clock second
    pub speed_up: f64,
    pub paused: bool,
    /// Simulation time elapsed since the context was built
    pub elapsed: f64,
    /// Sample times used for forecasts
    pub sample_times: Vec<f64>,
    selected: Option<BodyId>,
}

impl SimulationContext {
    pub fn new(world: World, step_size: f64, speed_up: f64) -> Self {
        Self {
            world,
            step_size,
            speed_up,
            paused: false,
            elapsed: 0.0,
            sample_times: ForecastRequest::evenly_spaced(DEFAULT_SAMPLES, DEFAULT_SPACING)
                .sample_times,
            selected: None,
        }
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.world.find(name)
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// Advance by a wall-clock interval scaled by the speed-up factor.
    /// Returns the number of physics sub-steps taken; zero while paused.
    pub fn advance_real_time(&mut self, wall_dt: f64) -> Result<usize, WorldError> {
        if self.paused {
            return Ok(0);
        }
        self.advance_sim_time(wall_dt * self.speed_up)
    }

    /// Advance by an interval of simulation time, ignoring the pause flag
    pub fn advance_sim_time(&mut self, sim_dt: f64) -> Result<usize, WorldError> {
        let steps = self.world.advance(sim_dt, self.step_size)?;
        self.elapsed += sim_dt;
        Ok(steps)
    }

    pub fn schedule_burn(
        &mut self,
        id: BodyId,
        time_until_start: f64,
        time_until_end: f64,
        direction: f64,
    ) -> Result<(), WorldError> {
        self.world
            .schedule_burn(id, time_until_start, time_until_end, direction)
    }

    /// Forecast request for the current selection
    pub fn forecast_request(&self) -> ForecastRequest {
        let request =
            ForecastRequest::new(self.sample_times.clone()).with_step_size(self.step_size);
        match self.selected {
            Some(id) if self.world.is_massless(id) => request.with_focus(id),
            _ => request,
        }
    }

    pub fn forecast(&self) -> Result<Forecast, PredictError> {
        self.world.forecast(&self.forecast_request())
    }

    /// Select a body: pauses the live simulation and forecasts with the body
    /// in focus. A massive body can be selected but is not put in focus.
    pub fn select(&mut self, id: BodyId) -> Result<Forecast, ControlError> {
        if self.world.body(id).is_none() {
            return Err(WorldError::UnknownBody(id).into());
        }
        self.selected = Some(id);
        self.paused = true;
        debug!(%id, "selected body");
        Ok(self.forecast()?)
    }

    /// Clear the selection and resume the live simulation
    pub fn deselect(&mut self) {
        self.selected = None;
        self.paused = false;
    }

    /// Schedule a burn on the selected body between two forecast samples.
    ///
    /// Dragging forward along the path burns prograde, dragging backward
    /// burns retrograde over the same interval. Equal indices schedule
    /// nothing. Only a massless selection has a path, so a massive one is
    /// refused.
    pub fn schedule_burn_between_samples(
        &mut self,
        start_index: usize,
        end_index: usize,
    ) -> Result<Option<Burn>, ControlError> {
        let id = self.selected.ok_or(ControlError::NoSelection)?;
        if !self.world.is_massless(id) {
            return Err(ControlError::MassiveSelection(id));
        }
        let time_at = |index: usize| {
            self.sample_times
                .get(index)
                .copied()
                .ok_or(ControlError::SampleIndexOutOfRange {
                    index,
                    len: self.sample_times.len(),
                })
        };
        let start = time_at(start_index)?;
        let end = time_at(end_index)?;

        let burn = if end > start {
            Burn::new(start, end, 1.0)
        } else if end < start {
            Burn::new(end, start, -1.0)
        } else {
            return Ok(None);
        };
        self.world
            .schedule_burn(id, burn.time_until_start, burn.time_until_end, burn.direction)?;
        Ok(Some(burn))
    }
}

/// Build a context from a scenario.
///
/// Errors in the scenario reject it; warnings are logged and returned.
pub fn build_simulation_context(
    config: &ScenarioConfig,
) -> Result<(SimulationContext, Diagnostics), ConfigError> {
    let diagnostics = analyze_scenario(config);
    if diagnostics.has_errors() {
        return Err(ConfigError::Rejected(diagnostics));
    }
    for warning in diagnostics.warnings() {
        warn!("{}", warning);
    }

    let world = build_world(config)?;
    let universe = &config.universe;
    let mut ctx = SimulationContext::new(world, universe.step_size, universe.speed_up);

    if let Some(forecast) = &config.forecast {
        ctx.sample_times = forecast.sample_times();
        if let Some(focus) = &forecast.focus {
            // analysis already checked that the focus exists and is massless
            ctx.selected = ctx.world.find(focus);
        }
    }

    Ok((ctx, diagnostics))
}

pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<(SimulationContext, Diagnostics), ConfigError> {
    let config = ScenarioConfig::from_yaml_str(source)?;
    build_simulation_context(&config)
}

/// Build a World from a scenario, registering bodies in file order
pub fn build_world(config: &ScenarioConfig) -> Result<World, ConfigError> {
    let mut world = World::with_constants(config.universe.g, config.universe.r_power);

    for body_config in &config.bodies {
        let body = Body::new(DVec2::from(body_config.position), body_config.mass)
            .with_name(body_config.name.clone())
            .with_velocity(DVec2::from(body_config.velocity))
            .with_max_thrust(body_config.max_thrust);
        let id = world.add_body(body)?;

        for burn in &body_config.burns {
            world.schedule_burn(id, burn.start, burn.end, burn.direction)?;
        }
    }

    Ok(world)
}

/// Snapshot of every body in stepping order
pub fn get_body_states(ctx: &SimulationContext) -> Vec<BodyState> {
    ctx.world
        .bodies()
        .map(|(id, body)| BodyState {
            id,
            name: body.name().to_string(),
            position: body.position(),
            velocity: body.velocity(),
            heading: body.kinematics().direction(),
            heading_deg: body.kinematics().direction_deg(),
            thrust: body.thrust(),
            massive: body.is_massive(),
            pending_burns: body.burns().len(),
        })
        .collect()
}

/// Index of the point closest to `target`, if it lies within `max_distance`
pub fn nearest_sample(points: &[DVec2], target: DVec2, max_distance: f64) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance_squared(target)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|&(_, d2)| d2 < max_distance * max_distance)
        .map(|(i, _)| i)
}
