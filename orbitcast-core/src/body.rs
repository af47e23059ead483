//! Simulated bodies: planets (massive) and craft (massless)

use crate::burn::{Burn, BurnSchedule};
use crate::kinematics::Kinematics;
use glam::DVec2;
use std::fmt;

/// Default thrust acceleration magnitude of a craft, in m/s^2
pub const DEFAULT_MAX_THRUST: f64 = 1.0e-1;

/// Handle to a body registered in a [`crate::World`].
///
/// Handles are indices into the world's body storage, so they stay valid on
/// a cloned world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point mass with optional thrust control
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    name: String,
    kinematics: Kinematics,
    mass: f64,
    max_thrust: f64,
    thrust: f64,
    thrust_vector: DVec2,
    burns: BurnSchedule,
}

impl Body {
    /// A body at rest. `mass == 0.0` makes it a massless craft.
    pub fn new(position: DVec2, mass: f64) -> Self {
        Self {
            name: String::new(),
            kinematics: Kinematics::new(position, DVec2::ZERO),
            mass,
            max_thrust: DEFAULT_MAX_THRUST,
            thrust: 0.0,
            thrust_vector: DVec2::ZERO,
            burns: BurnSchedule::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.kinematics = Kinematics::new(self.kinematics.position(), velocity);
        self
    }

    pub fn with_max_thrust(mut self, max_thrust: f64) -> Self {
        self.max_thrust = max_thrust;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn position(&self) -> DVec2 {
        self.kinematics.position()
    }

    pub fn velocity(&self) -> DVec2 {
        self.kinematics.velocity()
    }

    pub fn acceleration(&self) -> DVec2 {
        self.kinematics.acceleration()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn is_massive(&self) -> bool {
        self.mass > 0.0
    }

    pub fn max_thrust(&self) -> f64 {
        self.max_thrust
    }

    /// Live thrust scalar: -1, 0 or +1 for schedule-driven burns
    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    /// Override the live thrust scalar. The burn schedule reassigns it on the
    /// next phase 1.
    pub fn set_thrust(&mut self, thrust: f64) {
        self.thrust = thrust;
    }

    /// Thrust reaction acceleration applied on the next phase 1
    pub fn thrust_vector(&self) -> DVec2 {
        self.thrust_vector
    }

    pub fn burns(&self) -> &BurnSchedule {
        &self.burns
    }

    pub fn schedule_burn(&mut self, time_until_start: f64, time_until_end: f64, direction: f64) {
        self.burns
            .push(Burn::new(time_until_start, time_until_end, direction));
    }

    /// Sum of the directions of every burn that has started
    pub fn active_burn_intensity(&self) -> f64 {
        self.burns.active_intensity()
    }

    /// Phase 1: store the new acceleration and advance the burn schedule.
    ///
    /// `gravity` is the field acceleration at the body's current position,
    /// sampled before any body of the world moved this tick. The thrust
    /// vector is the one computed at the end of the previous tick.
    pub fn update1(&mut self, dt: f64, gravity: DVec2) {
        self.kinematics
            .update_acceleration(gravity + self.thrust_vector);
        self.thrust = self.burns.advance(dt);
    }

    /// Phase 2: integrate, then recompute the thrust vector for the next tick
    pub fn update2(&mut self, dt: f64) {
        self.kinematics.update_pos_vel(dt);

        let speed = self.kinematics.speed();
        // A body at rest has no heading; thrust along +x.
        let heading = if speed > 0.0 {
            self.kinematics.velocity() / speed
        } else {
            DVec2::X
        };
        self.thrust_vector = heading * (self.thrust * self.max_thrust);
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        let v = self.velocity();
        let a = self.acceleration();
        writeln!(
            f,
            "m: {:9.2e} p: ({:9.2e},{:9.2e}) v: ({:9.2e},{:9.2e}) a: ({:9.2e},{:9.2e})",
            self.mass, p.x, p.y, v.x, v.y, a.x, a.y
        )?;
        for burn in &self.burns {
            writeln!(f, "  {}", burn)?;
        }
        Ok(())
    }
}
