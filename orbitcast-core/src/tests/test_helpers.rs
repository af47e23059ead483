//! Test helper utilities for orbitcast tests

use crate::body::{Body, BodyId};
use crate::config::ScenarioConfig;
use crate::engine::World;
use crate::predictor::Forecast;
use crate::runtime::{build_simulation_context, SimulationContext};
use glam::DVec2;
use std::path::{Path, PathBuf};

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Check if two vectors are approximately equal, component-wise
pub fn approx_eq_vec(a: DVec2, b: DVec2, tol: f64) -> bool {
    approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol)
}

/// Path of a fixture scenario under `tests/data`
pub fn fixture_path(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(filename)
}

/// Load a fixture scenario under `tests/data`
pub fn load_fixture(filename: &str) -> Result<ScenarioConfig, Box<dyn std::error::Error>> {
    Ok(ScenarioConfig::from_path(fixture_path(filename))?)
}

/// Build a simulation context from a fixture scenario
pub fn load_fixture_context(
    filename: &str,
) -> Result<SimulationContext, Box<dyn std::error::Error>> {
    let config = load_fixture(filename)?;
    let (ctx, _diagnostics) = build_simulation_context(&config)?;
    Ok(ctx)
}

/// World with one planet of mass `planet_mass` at the origin and one craft on
/// a circular orbit of radius `radius`, moving counter-clockwise
pub fn circular_orbit_world(g: f64, planet_mass: f64, radius: f64) -> (World, BodyId, BodyId) {
    let mut world = World::with_constants(g, -2.0);
    let planet = world
        .add_body(Body::new(DVec2::ZERO, planet_mass).with_name("planet"))
        .expect("planet mass is valid");

    let speed = (g * planet_mass / radius).sqrt();
    let craft = world
        .add_body(
            Body::new(DVec2::new(radius, 0.0), 0.0)
                .with_name("craft")
                .with_velocity(DVec2::new(0.0, speed)),
        )
        .expect("craft mass is valid");

    (world, planet, craft)
}

/// True when two forecasts are bit-for-bit identical
pub fn forecasts_identical(a: &Forecast, b: &Forecast) -> bool {
    if a.sample_times.len() != b.sample_times.len() || a.bodies.len() != b.bodies.len() {
        return false;
    }
    a.bodies.iter().zip(&b.bodies).all(|(x, y)| {
        x.body == y.body
            && x.burns.iter().map(|v| v.to_bits()).eq(y.burns.iter().map(|v| v.to_bits()))
            && x
                .positions
                .iter()
                .map(|p| (p.x.to_bits(), p.y.to_bits()))
                .eq(y.positions.iter().map(|p| (p.x.to_bits(), p.y.to_bits())))
    })
}

/// Render a forecast as one line per sample, for snapshot comparisons
pub fn forecast_to_text(forecast: &Forecast) -> String {
    use std::fmt::Write;

    let mut text = String::new();
    for track in &forecast.bodies {
        writeln!(text, "body {}", track.body).unwrap();
        for ((t, p), burn) in forecast
            .sample_times
            .iter()
            .zip(&track.positions)
            .zip(&track.burns)
        {
            writeln!(text, "  t={:.1} x={:.9e} y={:.9e} burn={}", t, p.x, p.y, burn).unwrap();
        }
    }
    text
}
