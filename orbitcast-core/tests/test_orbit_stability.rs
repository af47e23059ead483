//! Long-run behavior of the integrator on a circular orbit

use glam::DVec2;
use orbitcast_core::tests::test_helpers::circular_orbit_world;
use std::f64::consts::PI;

#[test]
fn test_circular_orbit_keeps_radius() {
    let radius = 100.0;
    let (mut world, planet, craft) = circular_orbit_world(1.0, 1.0e4, radius);

    // speed 10, period 2*pi*r/v ~ 62.8; run about ten orbits
    let dt = 0.01;
    let steps = (10.0 * 2.0 * PI * radius / 10.0 / dt) as usize;
    let mut max_error: f64 = 0.0;
    for _ in 0..steps {
        world.step(dt);
        let r = world[craft].position().length();
        max_error = max_error.max((r - radius).abs() / radius);
    }

    assert!(max_error < 0.01, "radius drifted by {:.4}%", max_error * 100.0);
    assert_eq!(world[planet].position(), DVec2::ZERO);
}

#[test]
fn test_orbit_goes_counter_clockwise() {
    let (mut world, _, craft) = circular_orbit_world(1.0, 1.0e4, 100.0);

    // a quarter period takes the craft from +x to roughly +y
    let quarter = 2.0 * PI * 100.0 / 10.0 / 4.0;
    world.advance(quarter, 0.01).unwrap();

    let p = world[craft].position();
    assert!(p.y > 99.0, "expected craft near +y, got {}", p);
    assert!(p.x.abs() < 1.0, "expected craft near +y, got {}", p);
}

#[test]
fn test_earth_orbit_with_si_constants() {
    let g = 6.67e-11;
    let earth = 5.97e24;
    let radius = 7.0e6;
    let (mut world, _, craft) = circular_orbit_world(g, earth, radius);

    // one orbit in 1 s steps
    let period = 2.0 * PI * (radius.powi(3) / (g * earth)).sqrt();
    world.advance(period, 1.0).unwrap();

    let r = world[craft].position().length();
    assert!((r - radius).abs() / radius < 2.0e-3);
    assert!(world[craft].position().distance(DVec2::new(radius, 0.0)) < 0.01 * radius);
}

#[test]
fn test_heading_follows_velocity() {
    let (mut world, _, craft) = circular_orbit_world(1.0, 1.0e4, 100.0);
    world.step(0.01);

    // moving towards +y: y-down heading is close to -90 degrees
    let heading = world[craft].kinematics().direction_deg();
    assert!((heading + 90.0).abs() < 0.1, "heading {}", heading);
}
