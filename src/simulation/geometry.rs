//! Geometry helpers for the simulation plane.
//!
//! Contains helper functions for:
//! - Distance calculations (squared distance to avoid sqrt in range checks)
//! - Keeping positions inside the map bounds

use super::types::MapBounds;
use crate::common::types::Position;

/// Squared Euclidean distance in world units.
///
/// Range checks compare against `max_range²`, so the square root is only
/// taken when the actual distance feeds the link model.
pub fn distance2(a: &Position, b: &Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

pub fn distance(a: &Position, b: &Position) -> f64 {
    distance2(a, b).sqrt()
}

/// Clamp a position onto the map. NaN coordinates collapse to 0.
pub fn clamp_to_bounds(position: Position, bounds: &MapBounds) -> Position {
    Position {
        x: clamp_axis(position.x, bounds.width),
        y: clamp_axis(position.y, bounds.height),
    }
}

pub fn is_within_bounds(position: &Position, bounds: &MapBounds) -> bool {
    (0.0..=bounds.width).contains(&position.x) && (0.0..=bounds.height).contains(&position.y)
}

/// A NaN or non-positive map extent pins the axis to 0.
fn clamp_axis(value: f64, max: f64) -> f64 {
    let max = if max > 0.0 { max } else { 0.0 };
    if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Position {
        Position { x, y }
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance2(&p(0.0, 0.0), &p(3.0, 4.0)), 25.0);
        assert_eq!(distance(&p(0.0, 0.0), &p(3.0, 4.0)), 5.0);
        assert_eq!(distance(&p(7.0, 7.0), &p(7.0, 7.0)), 0.0);
    }

    #[test]
    fn clamp_keeps_points_on_the_map() {
        let bounds = MapBounds::default();
        assert_eq!(clamp_to_bounds(p(-5.0, 1200.0), &bounds), p(0.0, 1000.0));
        assert_eq!(clamp_to_bounds(p(500.0, 250.0), &bounds), p(500.0, 250.0));
        assert_eq!(clamp_to_bounds(p(f64::NAN, 10.0), &bounds), p(0.0, 10.0));
    }

    #[test]
    fn clamp_tolerates_degenerate_bounds() {
        let bounds = MapBounds {
            width: f64::NAN,
            height: -10.0,
        };
        assert_eq!(clamp_to_bounds(p(40.0, 40.0), &bounds), p(0.0, 0.0));
    }

    #[test]
    fn bounds_check_is_inclusive() {
        let bounds = MapBounds::default();
        assert!(is_within_bounds(&p(0.0, 1000.0), &bounds));
        assert!(!is_within_bounds(&p(1000.1, 0.0), &bounds));
    }
}
