//! Burn schedule bookkeeping
//!
//! A burn is a countdown pair relative to "now": it starts once
//! `time_until_start` reaches zero and is dropped once `time_until_end`
//! does. Entries are kept in the order they were scheduled.

use std::fmt;

/// A scheduled interval of constant thrust direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burn {
    pub time_until_start: f64,
    pub time_until_end: f64,
    /// Thrust direction, +1 along the velocity and -1 against it
    pub direction: f64,
}

impl Burn {
    pub fn new(time_until_start: f64, time_until_end: f64, direction: f64) -> Self {
        Self {
            time_until_start,
            time_until_end,
            direction,
        }
    }

    pub fn has_started(&self) -> bool {
        self.time_until_start <= 0.0
    }

    pub fn has_ended(&self) -> bool {
        self.time_until_end <= 0.0
    }

    pub fn is_active(&self) -> bool {
        self.has_started() && !self.has_ended()
    }
}

impl fmt::Display for Burn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "burn start: {:10.2e}s, end: {:10.2e}s, direction: {:5.2}",
            self.time_until_start, self.time_until_end, self.direction
        )
    }
}

/// Ordered list of burns on one body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurnSchedule {
    entries: Vec<Burn>,
}

impl BurnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a burn. No validation: inverted or already expired intervals
    /// are kept and simply never fire.
    pub fn push(&mut self, burn: Burn) {
        self.entries.push(burn);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Burn] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Burn> {
        self.entries.iter()
    }

    /// Count every entry down by `dt`, drop the ones that ended, and return
    /// the thrust direction for this step.
    ///
    /// When several entries are active at once the lowest-index one wins.
    /// Returns 0.0 when nothing is active.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let mut thrust = None;
        self.entries.retain_mut(|burn| {
            burn.time_until_start -= dt;
            burn.time_until_end -= dt;
            if burn.has_ended() {
                return false;
            }
            if burn.has_started() && thrust.is_none() {
                thrust = Some(burn.direction);
            }
            true
        });
        thrust.unwrap_or(0.0)
    }

    /// Sum of the directions of every active entry.
    ///
    /// Unlike the single winning thrust this exposes overlapping opposite
    /// burns, which cancel towards zero here. Entries that already ended but
    /// were not yet pruned by a step do not count. An idle schedule reports
    /// +0.0.
    pub fn active_intensity(&self) -> f64 {
        self.entries
            .iter()
            .filter(|burn| burn.is_active())
            .fold(0.0, |acc, burn| acc + burn.direction)
    }
}

impl<'a> IntoIterator for &'a BurnSchedule {
    type Item = &'a Burn;
    type IntoIter = std::slice::Iter<'a, Burn>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn schedule(burns: &[(f64, f64, f64)]) -> BurnSchedule {
        let mut schedule = BurnSchedule::new();
        for &(start, end, direction) in burns {
            schedule.push(Burn::new(start, end, direction));
        }
        schedule
    }

    #[test]
    fn idle_until_start() {
        let mut s = schedule(&[(10.0, 20.0, 1.0)]);
        assert_eq!(s.advance(5.0), 0.0);
        assert_eq!(s.advance(5.0), 1.0);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn entry_removed_once_end_reached() {
        let mut s = schedule(&[(0.0, 10.0, -1.0)]);
        assert_eq!(s.advance(5.0), -1.0);
        assert_eq!(s.advance(5.0), 0.0);
        assert!(s.is_empty());
    }

    #[test]
    fn lowest_index_active_entry_wins() {
        let mut s = schedule(&[(-5.0, 10.0, 1.0), (-2.0, 8.0, -1.0)]);
        assert_eq!(s.advance(1.0), 1.0);

        let mut s = schedule(&[(-2.0, 8.0, -1.0), (-5.0, 10.0, 1.0)]);
        assert_eq!(s.advance(1.0), -1.0);
    }

    #[test]
    fn pending_entry_does_not_shadow_active_one() {
        let mut s = schedule(&[(50.0, 60.0, -1.0), (0.0, 10.0, 1.0)]);
        assert_eq!(s.advance(1.0), 1.0);
    }

    #[test]
    fn malformed_intervals_are_inert() {
        // end before start: expires before it could ever fire
        let mut s = schedule(&[(10.0, 5.0, 1.0), (-3.0, -1.0, -1.0)]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.advance(0.5), 0.0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.advance(5.0), 0.0);
        assert!(s.is_empty());
    }

    #[test]
    fn intensity_sums_started_entries() {
        let s = schedule(&[(-1.0, 5.0, 1.0), (0.0, 5.0, -1.0), (3.0, 5.0, 1.0)]);
        assert_eq!(s.active_intensity(), 0.0);

        let s = schedule(&[(-1.0, 5.0, 1.0), (0.0, 5.0, 1.0), (3.0, 5.0, -1.0)]);
        assert_eq!(s.active_intensity(), 2.0);
    }

    #[test]
    fn intensity_ignores_unpruned_expired_entries() {
        let s = schedule(&[(-5.0, -1.0, 1.0), (-3.0, 0.0, -1.0)]);
        assert_eq!(s.active_intensity(), 0.0);
    }

    #[test]
    fn idle_intensity_is_positive_zero() {
        assert!(BurnSchedule::new().active_intensity().is_sign_positive());
        let s = schedule(&[(3.0, 5.0, -1.0)]);
        assert!(s.active_intensity().is_sign_positive());
    }

    proptest! {
        #[test]
        fn thrust_matches_first_active_survivor(
            burns in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, prop::bool::ANY), 0..12),
            dt in 0.0f64..20.0,
        ) {
            let burns: Vec<_> = burns
                .into_iter()
                .map(|(start, end, up)| (start, end, if up { 1.0 } else { -1.0 }))
                .collect();
            let mut s = schedule(&burns);
            let thrust = s.advance(dt);

            prop_assert!(s.iter().all(|b| b.time_until_end > 0.0));
            let expected = s
                .iter()
                .find(|b| b.time_until_start <= 0.0)
                .map(|b| b.direction)
                .unwrap_or(0.0);
            prop_assert_eq!(thrust, expected);
        }
    }
}
