//! 2D vector helpers
//!
//! Positions, velocities and accelerations are plain `glam::DVec2`. glam
//! already provides addition, scaling (both `v * s` and `s * v`), magnitude,
//! normalization, distance and exact component equality. [`VectorExt`] adds
//! the in-place chaining variants, rotation in degrees, tolerance-based
//! closeness and pair conversion.

use glam::DVec2;

/// Vector type used throughout the simulation
pub type Vector = DVec2;

/// Extra vector operations used by the simulation and its consumers
pub trait VectorExt: Sized {
    /// Add `other` in place and return `self` for chaining
    fn add_mut(&mut self, other: Self) -> &mut Self;

    /// Scale in place and return `self` for chaining
    fn scale_mut(&mut self, factor: f64) -> &mut Self;

    /// Normalize in place.
    ///
    /// The magnitude must be nonzero; a zero vector yields non-finite
    /// components.
    fn normalize_mut(&mut self) -> &mut Self;

    /// Rotate counter-clockwise by `angle_deg` degrees, returning a new vector
    fn rotated_deg(self, angle_deg: f64) -> Self;

    /// Rotate counter-clockwise by `angle_deg` degrees in place
    fn rotate_deg(&mut self, angle_deg: f64) -> &mut Self;

    /// True when the Euclidean distance to `other` is at most `tolerance`
    fn is_close(self, other: Self, tolerance: f64) -> bool;

    /// Convert to an `(x, y)` pair
    fn to_pair(self) -> (f64, f64);
}

impl VectorExt for DVec2 {
    fn add_mut(&mut self, other: Self) -> &mut Self {
        *self += other;
        self
    }

    fn scale_mut(&mut self, factor: f64) -> &mut Self {
        *self *= factor;
        self
    }

    fn normalize_mut(&mut self) -> &mut Self {
        *self /= self.length();
        self
    }

    fn rotated_deg(self, angle_deg: f64) -> Self {
        DVec2::from_angle(angle_deg.to_radians()).rotate(self)
    }

    fn rotate_deg(&mut self, angle_deg: f64) -> &mut Self {
        *self = self.rotated_deg(angle_deg);
        self
    }

    fn is_close(self, other: Self, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }

    fn to_pair(self) -> (f64, f64) {
        (self.x, self.y)
    }
}
