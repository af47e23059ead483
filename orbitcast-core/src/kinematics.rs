//! Point-mass kinematics with semi-implicit Euler integration
//!
//! The world first stores a fresh acceleration on every body with
//! [`Kinematics::update_acceleration`], and only then advances velocity and
//! position with [`Kinematics::update_pos_vel`].

use glam::DVec2;
use std::fmt;

/// Position, velocity and acceleration of a single body
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    position: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    direction: f64,
    direction_deg: f64,
}

impl Kinematics {
    pub fn new(position: DVec2, velocity: DVec2) -> Self {
        Self::with_acceleration(position, velocity, DVec2::ZERO)
    }

    pub fn with_acceleration(position: DVec2, velocity: DVec2, acceleration: DVec2) -> Self {
        let mut kinematics = Self {
            position,
            velocity,
            acceleration,
            direction: 0.0,
            direction_deg: 0.0,
        };
        kinematics.update_directions();
        kinematics
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Heading of the velocity in radians.
    ///
    /// Measured with the y axis pointing down, which is the orientation the
    /// rendering layer draws in: a body moving towards +y has a heading of
    /// -pi/2.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Heading of the velocity in degrees, same orientation as [`Self::direction`]
    pub fn direction_deg(&self) -> f64 {
        self.direction_deg
    }

    pub fn update_acceleration(&mut self, acceleration: DVec2) {
        self.acceleration = acceleration;
    }

    /// Advance by `dt`: velocity first, then position with the updated velocity
    pub fn update_pos_vel(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.update_directions();
    }

    fn update_directions(&mut self) {
        self.direction = (-self.velocity.y).atan2(self.velocity.x);
        self.direction_deg = self.direction.to_degrees();
    }
}

impl fmt::Display for Kinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kinematics(position={},velocity={},acceleration={})",
            self.position, self.velocity, self.acceleration
        )
    }
}
