use crate::body::{Body, BodyId};
use glam::DVec2;
use std::fmt;
use std::ops::Index;
use thiserror::Error;
use tracing::{debug, trace};

/// Default gravitational constant (SI units)
pub const DEFAULT_G: f64 = 6.67e-11;
/// Default force-law exponent: inverse square
pub const DEFAULT_R_POWER: f64 = -2.0;
/// Masses closer than this to a query point contribute nothing to the field
pub const SINGULARITY_DISTANCE: f64 = 0.001;

/// Errors raised by world operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error("body {0} is not registered in this world")]
    UnknownBody(BodyId),
    #[error("invalid body mass {0}: must be finite and non-negative")]
    InvalidMass(f64),
    #[error("invalid step: total {total} with maximum sub-step {max_step}")]
    InvalidStep { total: f64, max_step: f64 },
}

/// The physics world: a central gravity field made by the massive bodies,
/// acting on every body
#[derive(Debug, Clone)]
pub struct World {
    bodies: Vec<Body>,
    massive: Vec<BodyId>,
    massless: Vec<BodyId>,
    g: f64,
    r_power: f64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_constants(DEFAULT_G, DEFAULT_R_POWER)
    }

    /// A world where a mass `m` at distance `r` accelerates at `g * m * r^r_power`
    pub fn with_constants(g: f64, r_power: f64) -> Self {
        Self {
            bodies: Vec::new(),
            massive: Vec::new(),
            massless: Vec::new(),
            g,
            r_power,
        }
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn r_power(&self) -> f64 {
        self.r_power
    }

    /// Register a body. Its partition (massive or massless) is fixed here.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, WorldError> {
        let mass = body.mass();
        if !mass.is_finite() || mass < 0.0 {
            return Err(WorldError::InvalidMass(mass));
        }

        let id = BodyId(self.bodies.len());
        if body.is_massive() {
            self.massive.push(id);
        } else {
            self.massless.push(id);
        }
        debug!(%id, name = body.name(), mass, massive = body.is_massive(), "registered body");
        self.bodies.push(body);
        Ok(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Look up a body by name. Names are not required to be unique; the
    /// first registered match is returned.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.name() == name)
            .map(BodyId)
    }

    pub fn massive_ids(&self) -> &[BodyId] {
        &self.massive
    }

    pub fn massless_ids(&self) -> &[BodyId] {
        &self.massless
    }

    pub fn is_massless(&self, id: BodyId) -> bool {
        self.massless.contains(&id)
    }

    /// Body ids in stepping order: massive first, then massless, each in
    /// registration order
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.massive.iter().chain(self.massless.iter()).copied()
    }

    /// Bodies in stepping order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.ids().map(move |id| (id, &self.bodies[id.0]))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn schedule_burn(
        &mut self,
        id: BodyId,
        time_until_start: f64,
        time_until_end: f64,
        direction: f64,
    ) -> Result<(), WorldError> {
        let body = self
            .bodies
            .get_mut(id.0)
            .ok_or(WorldError::UnknownBody(id))?;
        debug!(%id, time_until_start, time_until_end, direction, "scheduled burn");
        body.schedule_burn(time_until_start, time_until_end, direction);
        Ok(())
    }

    /// Manually override the live thrust of a body until the next step
    pub fn set_thrust(&mut self, id: BodyId, thrust: f64) -> Result<(), WorldError> {
        self.bodies
            .get_mut(id.0)
            .ok_or(WorldError::UnknownBody(id))?
            .set_thrust(thrust);
        Ok(())
    }

    /// Gravitational acceleration at `position` from every massive body
    pub fn acceleration_at(&self, position: DVec2) -> DVec2 {
        let mut accel = DVec2::ZERO;

        for id in &self.massive {
            let mass_body = &self.bodies[id.0];
            let delta = mass_body.position() - position;
            let r = delta.length();
            if r < SINGULARITY_DISTANCE {
                continue;
            }
            let magnitude = self.g * mass_body.mass() * r.powf(self.r_power);
            accel += delta * (magnitude / r);
        }

        accel
    }

    /// Advance every body by `dt`.
    ///
    /// All phase-1 updates run before any phase-2 update, so the whole tick
    /// sees one consistent snapshot of the massive bodies' positions.
    pub fn step(&mut self, dt: f64) {
        trace!(dt, "world step");

        // Sample the field for every body before anything moves
        let field: Vec<DVec2> = self
            .ids()
            .map(|id| self.acceleration_at(self.bodies[id.0].position()))
            .collect();

        let Self {
            bodies,
            massive,
            massless,
            ..
        } = self;
        let order = massive.iter().chain(massless.iter());

        for (id, gravity) in order.clone().zip(field) {
            bodies[id.0].update1(dt, gravity);
        }
        for id in order {
            bodies[id.0].update2(dt);
        }
    }

    /// Advance by `total` in sub-steps of at most `max_step`.
    ///
    /// Runs `floor(total / max_step)` full sub-steps followed by one
    /// remainder sub-step, which is executed even when it is zero. Returns
    /// the number of sub-steps taken.
    pub fn advance(&mut self, total: f64, max_step: f64) -> Result<usize, WorldError> {
        if !(total.is_finite() && total >= 0.0 && max_step.is_finite() && max_step > 0.0) {
            return Err(WorldError::InvalidStep { total, max_step });
        }

        let full_steps = (total / max_step).floor() as usize;
        let remainder = total % max_step;
        for _ in 0..full_steps {
            self.step(max_step);
        }
        self.step(remainder);
        Ok(full_steps + 1)
    }

    /// Owned copy of the complete world state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot(self.clone())
    }

    /// Replace the whole world state with a previously taken snapshot
    pub fn restore(&mut self, snapshot: WorldSnapshot) {
        *self = snapshot.0;
    }
}

impl Index<BodyId> for World {
    type Output = Body;

    fn index(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, body) in self.bodies() {
            write!(f, "{}", body)?;
        }
        Ok(())
    }
}

/// Detached copy of a world, independent of the live one
#[derive(Debug, Clone)]
pub struct WorldSnapshot(World);

impl WorldSnapshot {
    pub fn world(&self) -> &World {
        &self.0
    }

    pub fn into_world(self) -> World {
        self.0
    }
}
