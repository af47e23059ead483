//! Static checks on scenario configurations
//!
//! This module inspects a parsed scenario before any world is built, so
//! mistakes surface as diagnostics instead of odd trajectories.

use crate::config::{BodyConfig, ForecastConfig, ScenarioConfig};
use crate::diagnostics::{Diagnostic, Diagnostics};
use std::collections::HashMap;

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(config: &ScenarioConfig) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let universe = &config.universe;
    for (field, value) in [("g", universe.g), ("r_power", universe.r_power)] {
        if !value.is_finite() {
            diagnostics.push(Diagnostic::error(
                format!("universe {} must be finite, got {}", field, value),
                None,
            ));
        }
    }
    for (field, value) in [("step_size", universe.step_size), ("speed_up", universe.speed_up)] {
        if !(value.is_finite() && value > 0.0) {
            diagnostics.push(Diagnostic::error(
                format!("universe {} must be finite and positive, got {}", field, value),
                None,
            ));
        }
    }

    // Duplicate names
    let mut names: HashMap<&str, usize> = HashMap::new();
    for (idx, body) in config.bodies.iter().enumerate() {
        if names.insert(body.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error("duplicate body name", Some(body.name.as_str())));
        }
        diagnostics.extend(check_body(body));
    }

    if !config.bodies.iter().any(|b| b.mass > 0.0) {
        diagnostics.push(Diagnostic::warning(
            "no massive bodies: there is no gravity field",
            None,
        ));
    }

    if let Some(forecast) = &config.forecast {
        diagnostics.extend(check_forecast(forecast, &config.bodies));
    }

    diagnostics
}

fn check_body(body: &BodyConfig) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let name = Some(body.name.as_str());

    let scalars = [body.mass, body.max_thrust];
    let mut numbers = body
        .position
        .iter()
        .chain(body.velocity.iter())
        .chain(scalars.iter());
    if numbers.any(|v| !v.is_finite()) {
        diagnostics.push(Diagnostic::error("non-finite initial state", name));
    }
    if body.mass < 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("negative mass {}", body.mass),
            name,
        ));
    }

    for (idx, burn) in body.burns.iter().enumerate() {
        if !(burn.start.is_finite() && burn.end.is_finite() && burn.direction.is_finite()) {
            diagnostics.push(Diagnostic::error(
                format!("burn {} has non-finite values", idx),
                name,
            ));
            continue;
        }
        if burn.end <= 0.0 {
            diagnostics.push(Diagnostic::warning(
                format!("burn {} has already ended (end {})", idx, burn.end),
                name,
            ));
        } else if burn.end <= burn.start {
            diagnostics.push(Diagnostic::warning(
                format!(
                    "burn {} ends before it starts (start {}, end {}) and will never fire",
                    idx, burn.start, burn.end
                ),
                name,
            ));
        }
    }

    if body.mass > 0.0 && !body.burns.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "burns on a massive body do not show up in forecasts",
            name,
        ));
    }

    diagnostics
}

fn check_forecast(forecast: &ForecastConfig, bodies: &[BodyConfig]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if let Some(focus) = &forecast.focus {
        match bodies.iter().find(|b| &b.name == focus) {
            None => diagnostics.push(Diagnostic::error(
                format!("forecast focus '{}' is not a body of this scenario", focus),
                None,
            )),
            Some(body) if body.mass > 0.0 => diagnostics.push(Diagnostic::error(
                format!("forecast focus '{}' is massive; only massless bodies are forecast", focus),
                None,
            )),
            Some(_) => {}
        }
    }

    match &forecast.times {
        Some(times) => {
            for (idx, &t) in times.iter().enumerate() {
                if !t.is_finite() || t < 0.0 {
                    diagnostics.push(Diagnostic::error(
                        format!("forecast time {} at index {} must be finite and non-negative", t, idx),
                        None,
                    ));
                }
            }
            if times.windows(2).any(|w| w[1] <= w[0]) {
                diagnostics.push(Diagnostic::error(
                    "forecast times must be strictly increasing",
                    None,
                ));
            }
        }
        None => {
            if !(forecast.spacing.is_finite() && forecast.spacing > 0.0) && forecast.samples > 1 {
                diagnostics.push(Diagnostic::error(
                    format!("forecast spacing must be positive, got {}", forecast.spacing),
                    None,
                ));
            }
        }
    }

    diagnostics
}
