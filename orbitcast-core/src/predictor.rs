//! Trajectory forecasting
//!
//! A forecast runs the world's own step function on a detached copy of the
//! world and samples every massless body at the requested elapsed times.
//! The live world is never touched.

use crate::body::BodyId;
use crate::engine::World;
use glam::DVec2;
use thiserror::Error;
use tracing::{debug, trace};

/// Default internal step of a forecast, in simulation seconds
pub const DEFAULT_STEP_SIZE: f64 = 1.0e2;

/// Reasons a forecast request is refused
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("focus body {0} is not a massless body of this world")]
    FocusNotFound(BodyId),
    #[error("sample time at index {index} is not finite")]
    NonFiniteSampleTime { index: usize },
    #[error("sample time {value} at index {index} is negative")]
    NegativeSampleTime { index: usize, value: f64 },
    #[error("sample times must be strictly increasing: {current} at index {index} follows {previous}")]
    NonIncreasingSampleTimes {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("forecast step size must be finite and positive, got {0}")]
    InvalidStepSize(f64),
}

/// What to forecast
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Elapsed simulation times to sample at, strictly increasing
    pub sample_times: Vec<f64>,
    /// Massless body to report first
    pub focus: Option<BodyId>,
    /// Largest internal integration step
    pub step_size: f64,
}

impl ForecastRequest {
    pub fn new(sample_times: Vec<f64>) -> Self {
        Self {
            sample_times,
            focus: None,
            step_size: DEFAULT_STEP_SIZE,
        }
    }

    /// `count` samples at `0, spacing, 2 * spacing, ...`
    pub fn evenly_spaced(count: usize, spacing: f64) -> Self {
        Self::new((0..count).map(|i| i as f64 * spacing).collect())
    }

    pub fn with_focus(mut self, focus: BodyId) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    fn validate(&self) -> Result<(), PredictError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(PredictError::InvalidStepSize(self.step_size));
        }

        let mut previous: Option<f64> = None;
        for (index, &value) in self.sample_times.iter().enumerate() {
            if !value.is_finite() {
                return Err(PredictError::NonFiniteSampleTime { index });
            }
            if value < 0.0 {
                return Err(PredictError::NegativeSampleTime { index, value });
            }
            if let Some(previous) = previous {
                if value <= previous {
                    return Err(PredictError::NonIncreasingSampleTimes {
                        index,
                        previous,
                        current: value,
                    });
                }
            }
            previous = Some(value);
        }
        Ok(())
    }
}

/// Predicted path of one massless body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyForecast {
    pub body: BodyId,
    /// Position at each sample time
    pub positions: Vec<DVec2>,
    /// Summed direction of all started burns at each sample time
    pub burns: Vec<f64>,
}

impl BodyForecast {
    fn with_capacity(body: BodyId, capacity: usize) -> Self {
        Self {
            body,
            positions: Vec::with_capacity(capacity),
            burns: Vec::with_capacity(capacity),
        }
    }
}

/// Result of a forecast: one track per massless body, focus body first
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub sample_times: Vec<f64>,
    pub bodies: Vec<BodyForecast>,
    /// Number of world steps the forecast integrated
    pub steps: usize,
}

impl Forecast {
    pub fn get(&self, id: BodyId) -> Option<&BodyForecast> {
        self.bodies.iter().find(|track| track.body == id)
    }

    /// Position sequences, one per body, in track order
    pub fn positions(&self) -> Vec<Vec<DVec2>> {
        self.bodies.iter().map(|t| t.positions.clone()).collect()
    }

    /// Burn intensity sequences, one per body, in track order
    pub fn burns(&self) -> Vec<Vec<f64>> {
        self.bodies.iter().map(|t| t.burns.clone()).collect()
    }
}

/// Forecast the massless bodies of `world` at the requested sample times.
///
/// Steps are `request.step_size` long except the last one before each
/// sample, which is shortened to land exactly on the sample time. A sample
/// time equal to the time already reached is recorded without stepping.
pub fn predict(world: &World, request: &ForecastRequest) -> Result<Forecast, PredictError> {
    request.validate()?;
    let order = track_order(world, request.focus)?;

    let mut future = world.snapshot().into_world();
    debug!(
        samples = request.sample_times.len(),
        bodies = order.len(),
        step_size = request.step_size,
        "forecast started"
    );

    let capacity = request.sample_times.len();
    let mut tracks: Vec<BodyForecast> = order
        .iter()
        .map(|&id| BodyForecast::with_capacity(id, capacity))
        .collect();

    let mut elapsed = 0.0;
    let mut steps = 0;
    for &sample_time in &request.sample_times {
        loop {
            let remaining = sample_time - elapsed;
            if remaining <= request.step_size {
                if remaining > 0.0 {
                    future.step(remaining);
                    steps += 1;
                }
                elapsed = sample_time;
                break;
            }
            future.step(request.step_size);
            elapsed += request.step_size;
            steps += 1;
        }

        trace!(sample_time, "forecast sample");
        for track in &mut tracks {
            let body = &future[track.body];
            track.positions.push(body.position());
            track.burns.push(body.active_burn_intensity());
        }
    }

    debug!(steps, "forecast finished");
    Ok(Forecast {
        sample_times: request.sample_times.clone(),
        bodies: tracks,
        steps,
    })
}

/// Massless bodies in output order. With a focus the focus comes first and
/// the remaining bodies follow in reverse registration order.
fn track_order(world: &World, focus: Option<BodyId>) -> Result<Vec<BodyId>, PredictError> {
    let massless = world.massless_ids();
    let Some(focus) = focus else {
        return Ok(massless.to_vec());
    };
    if !massless.contains(&focus) {
        return Err(PredictError::FocusNotFound(focus));
    }

    Ok(std::iter::once(focus)
        .chain(massless.iter().rev().copied().filter(|&id| id != focus))
        .collect())
}

/// Pure fast-forward: a new world `steps` ticks of `dt` ahead of `world`
pub fn fast_forward(world: &World, dt: f64, steps: usize) -> World {
    let mut future = world.snapshot().into_world();
    for _ in 0..steps {
        future.step(dt);
    }
    future
}

impl World {
    /// See [`predict`]
    pub fn forecast(&self, request: &ForecastRequest) -> Result<Forecast, PredictError> {
        predict(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;

    fn world_with_crafts(n: usize) -> (World, Vec<BodyId>) {
        let mut world = World::with_constants(1.0, -2.0);
        world.add_body(Body::new(DVec2::ZERO, 1.0e4)).unwrap();
        let crafts = (0..n)
            .map(|i| {
                let r = 100.0 + 10.0 * i as f64;
                let v = (1.0e4 / r).sqrt();
                world
                    .add_body(Body::new(DVec2::new(r, 0.0), 0.0).with_velocity(DVec2::new(0.0, v)))
                    .unwrap()
            })
            .collect();
        (world, crafts)
    }

    #[test]
    fn focus_goes_first_then_reversed() {
        let (world, crafts) = world_with_crafts(4);
        let order = track_order(&world, Some(crafts[1])).unwrap();
        assert_eq!(order, vec![crafts[1], crafts[3], crafts[2], crafts[0]]);

        let order = track_order(&world, None).unwrap();
        assert_eq!(order, crafts);
    }

    #[test]
    fn massive_focus_is_rejected() {
        let (world, _) = world_with_crafts(1);
        let planet = world.massive_ids()[0];
        let request = ForecastRequest::new(vec![100.0]).with_focus(planet);
        assert_eq!(predict(&world, &request), Err(PredictError::FocusNotFound(planet)));
    }

    #[test]
    fn sample_times_are_validated() {
        let (world, _) = world_with_crafts(1);
        let err = predict(&world, &ForecastRequest::new(vec![100.0, 100.0])).unwrap_err();
        assert!(matches!(err, PredictError::NonIncreasingSampleTimes { index: 1, .. }));

        let err = predict(&world, &ForecastRequest::new(vec![-1.0])).unwrap_err();
        assert!(matches!(err, PredictError::NegativeSampleTime { index: 0, .. }));

        let err = predict(&world, &ForecastRequest::new(vec![f64::NAN])).unwrap_err();
        assert_eq!(err, PredictError::NonFiniteSampleTime { index: 0 });

        let err = predict(&world, &ForecastRequest::new(vec![1.0]).with_step_size(0.0)).unwrap_err();
        assert_eq!(err, PredictError::InvalidStepSize(0.0));
    }

    #[test]
    fn step_count_shrinks_final_step() {
        let (world, _) = world_with_crafts(1);
        let forecast = predict(&world, &ForecastRequest::new(vec![250.0, 300.0])).unwrap();
        // 100 + 100 + 50, then 50
        assert_eq!(forecast.steps, 4);
    }

    #[test]
    fn sample_at_zero_records_current_state() {
        let (world, crafts) = world_with_crafts(1);
        let forecast = predict(&world, &ForecastRequest::evenly_spaced(3, 1000.0)).unwrap();
        assert_eq!(forecast.bodies[0].positions[0], world[crafts[0]].position());
        assert_eq!(forecast.bodies[0].positions.len(), 3);
    }

    #[test]
    fn expired_burn_is_not_reported_at_zero() {
        let (mut world, crafts) = world_with_crafts(1);
        world.schedule_burn(crafts[0], -5.0, -1.0, 1.0).unwrap();
        let forecast = predict(&world, &ForecastRequest::new(vec![0.0, 1.0])).unwrap();
        assert_eq!(forecast.bodies[0].burns, vec![0.0, 0.0]);
        assert!(forecast.bodies[0].burns.iter().all(|b| b.is_sign_positive()));
    }

    #[test]
    fn started_burn_is_reported_at_zero() {
        let (mut world, crafts) = world_with_crafts(1);
        world.schedule_burn(crafts[0], 0.0, 50.0, -1.0).unwrap();
        let forecast = predict(&world, &ForecastRequest::new(vec![0.0, 10.0, 100.0])).unwrap();
        assert_eq!(forecast.bodies[0].burns, vec![-1.0, -1.0, 0.0]);
    }

    #[test]
    fn empty_request_yields_empty_tracks() {
        let (world, crafts) = world_with_crafts(2);
        let forecast = predict(&world, &ForecastRequest::new(Vec::new())).unwrap();
        assert_eq!(forecast.bodies.len(), crafts.len());
        assert!(forecast.bodies.iter().all(|t| t.positions.is_empty()));
        assert_eq!(forecast.steps, 0);
    }

    #[test]
    fn fast_forward_leaves_source_untouched() {
        let (world, crafts) = world_with_crafts(1);
        let before = world[crafts[0]].clone();
        let ahead = fast_forward(&world, 10.0, 5);
        assert_eq!(world[crafts[0]], before);
        assert_ne!(ahead[crafts[0]].position(), before.position());
    }
}
