//! Proximity effects of a charged object
//!
//! Both experiments use the same idea: an effect that fades linearly from full
//! strength at the object to nothing at a cutoff distance. This is a classroom
//! heuristic; the constants are the tuned values of the demo, not physical ones.

use glam::Vec2;

use crate::constants::{ATTRACTION_RADIUS, DEFLECTION_RANGE, MAX_CURVATURE, PULL_RATE, STREAM_X};

/// A passive element that responds to the charged object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    pub id: u32,
    pub position: Vec2,
    pub affected: bool,
}

impl TargetPoint {
    pub fn new(id: u32, position: Vec2) -> Self {
        Self {
            id,
            position,
            affected: false,
        }
    }
}

/// Tuning of the balloon/paper attraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractionParams {
    pub radius: f32,
    pub pull_rate: f32,
}

impl Default for AttractionParams {
    fn default() -> Self {
        Self {
            radius: ATTRACTION_RADIUS,
            pull_rate: PULL_RATE,
        }
    }
}

/// Tuning of the ruler/water deflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeflectionParams {
    pub stream_x: f32,
    pub max_distance: f32,
    pub max_curvature: f32,
}

impl Default for DeflectionParams {
    fn default() -> Self {
        Self {
            stream_x: STREAM_X,
            max_distance: DEFLECTION_RANGE,
            max_curvature: MAX_CURVATURE,
        }
    }
}

/// Pull strength in [0, 2]: 2 at the balloon, 0 at the edge of the radius
pub fn attraction_strength(distance: f32, radius: f32) -> f32 {
    ((1.0 - distance.min(radius) / radius) * 2.0).clamp(0.0, 2.0)
}

/// One recompute step for a single piece.
///
/// The piece moves a fraction of the way towards `center`. Steps compound, and
/// a piece almost under the balloon can be carried past it.
pub fn attract(target: &TargetPoint, center: Vec2, params: &AttractionParams) -> TargetPoint {
    let delta = center - target.position;
    let distance = delta.length();

    if distance < params.radius {
        let strength = attraction_strength(distance, params.radius);
        TargetPoint {
            position: target.position + delta * params.pull_rate * strength,
            affected: true,
            ..*target
        }
    } else {
        TargetPoint {
            affected: false,
            ..*target
        }
    }
}

pub fn attract_all(targets: &[TargetPoint], center: Vec2, params: &AttractionParams) -> Vec<TargetPoint> {
    targets.iter().map(|t| attract(t, center, params)).collect()
}

/// Control-point offset of the water stream for a ruler centered at `ruler_center_x`.
///
/// Positive bends the stream to the right. A ruler exactly above the stream has
/// no side to pull towards and leaves it straight.
pub fn deflection(ruler_center_x: f32, params: &DeflectionParams) -> f32 {
    let dx = ruler_center_x - params.stream_x;
    let distance = dx.abs();

    if distance >= params.max_distance {
        return 0.0;
    }

    let direction = if dx > 0.0 {
        1.0
    } else if dx < 0.0 {
        -1.0
    } else {
        0.0
    };
    let strength = 1.0 - distance.min(params.max_distance) / params.max_distance;

    (direction * strength * params.max_curvature).clamp(-params.max_curvature, params.max_curvature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_at(x: f32, y: f32) -> TargetPoint {
        TargetPoint::new(1, Vec2::new(x, y))
    }

    #[test]
    fn far_piece_is_untouched() {
        let piece = piece_at(100.0, 350.0);
        let moved = attract(&piece, Vec2::new(220.0, 120.0), &AttractionParams::default());

        assert!(!moved.affected);
        assert_eq!(moved.position, piece.position);
    }

    #[test]
    fn piece_on_the_radius_is_untouched() {
        let piece = piece_at(0.0, 0.0);
        let moved = attract(&piece, Vec2::new(150.0, 0.0), &AttractionParams::default());
        assert!(!moved.affected);
        assert_eq!(moved.position, Vec2::ZERO);
    }

    #[test]
    fn close_piece_is_pulled_towards_the_balloon() {
        let piece = piece_at(100.0, 350.0);
        let center = Vec2::new(110.0, 345.0);
        let moved = attract(&piece, center, &AttractionParams::default());

        let delta = center - piece.position;
        let strength = (1.0 - delta.length() / 150.0) * 2.0;
        assert!(moved.affected);
        assert!(strength > 1.8 && strength < 2.0);

        let expected = piece.position + delta * 0.05 * strength;
        assert!((moved.position - expected).length() < 1e-4);
        assert!(moved.position.distance(center) < piece.position.distance(center));
    }

    #[test]
    fn strength_stays_in_range() {
        for step in 0..=200 {
            let d = step as f32;
            let s = attraction_strength(d, 150.0);
            assert!((0.0..=2.0).contains(&s), "strength {s} at distance {d}");
        }
        assert_eq!(attraction_strength(0.0, 150.0), 2.0);
    }

    #[test]
    fn strength_never_grows_with_distance() {
        let mut previous = f32::INFINITY;
        for step in 0..300 {
            let s = attraction_strength(step as f32 * 0.5, 150.0);
            assert!(s <= previous);
            previous = s;
        }
    }

    #[test]
    fn step_shrinks_with_distance_in_the_outer_half() {
        // The step is 0.1·d·(1 - d/R): it peaks at R/2 and falls off after it
        let params = AttractionParams::default();
        let mut previous = f32::INFINITY;

        for step in 75..150 {
            let piece = piece_at(step as f32, 0.0);
            let moved = attract(&piece, Vec2::ZERO, &params);
            let displacement = moved.position.distance(piece.position);
            assert!(displacement <= previous + 1e-5);
            previous = displacement;
        }
    }

    #[test]
    fn overshoot_is_not_corrected() {
        let params = AttractionParams {
            radius: 150.0,
            pull_rate: 0.8,
        };
        let piece = piece_at(1.0, 0.0);
        let moved = attract(&piece, Vec2::ZERO, &params);
        assert!(moved.position.x < 0.0);
    }

    #[test]
    fn ruler_to_the_right_bends_the_stream_right() {
        let params = DeflectionParams::default();
        assert!((deflection(300.0, &params) - 20.0).abs() < 1e-4);
        assert!((deflection(0.0, &params) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn ruler_above_the_stream_leaves_it_straight() {
        assert_eq!(deflection(150.0, &DeflectionParams::default()), 0.0);
    }

    #[test]
    fn distant_ruler_has_no_effect() {
        let params = DeflectionParams::default();
        assert_eq!(deflection(350.0, &params), 0.0);
        assert_eq!(deflection(-50.0, &params), 0.0);
        assert_eq!(deflection(1000.0, &params), 0.0);
    }

    #[test]
    fn curvature_is_bounded_and_signed() {
        let params = DeflectionParams::default();
        for step in -400..=700 {
            let x = step as f32;
            let c = deflection(x, &params);
            assert!((-80.0..=80.0).contains(&c));
            let dx = x - params.stream_x;
            if c != 0.0 {
                assert_eq!(c.signum(), dx.signum());
            }
        }
    }
}
