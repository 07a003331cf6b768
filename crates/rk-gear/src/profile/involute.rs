//! Involute Geometry
//!
//! Point evaluation on the involute of a circle, reflection across the tooth
//! axis, and a bisection solver for the involute/circle intersection.
//!
//! The involute used throughout starts on the +Y axis at roll angle 0:
//!
//! ```text
//! x = rb * (sin t - t * cos t)
//! y = rb * (cos t + t * sin t)
//! ```
//!
//! Its distance from the origin, `rb * sqrt(1 + t^2)`, increases monotonically
//! with `t`, which is what makes bisection on the radial residual valid.

use glam::DVec2;

use crate::constants::{BISECTION_MAX_ITERATIONS, BISECTION_TOLERANCE, SNAP_EPSILON};
use crate::error::{GearError, GearResult};

/// Point on the involute of a circle of radius `base_radius` at roll angle `t`
pub fn involute_point(base_radius: f64, t: f64) -> DVec2 {
    let (sin, cos) = t.sin_cos();
    DVec2::new(
        base_radius * (sin - t * cos),
        base_radius * (cos + t * sin),
    )
}

/// Rotate a point about the origin by `angle` radians (counter-clockwise)
pub fn rotate(point: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(point)
}

/// Reflect a point across the line through the origin and `axis_point`
pub fn reflect_across_axis(point: DVec2, axis_point: DVec2) -> DVec2 {
    let Some(axis) = axis_point.try_normalize() else {
        return point;
    };
    let foot = axis * point.dot(axis);
    2.0 * foot - point
}

/// Snap coordinates within [`SNAP_EPSILON`] of zero to exactly zero
pub fn snap(point: DVec2) -> DVec2 {
    let snap_axis = |v: f64| if v.abs() < SNAP_EPSILON { 0.0 } else { v };
    DVec2::new(snap_axis(point.x), snap_axis(point.y))
}

/// Bisection solver for the intersection of an involute with a circle
#[derive(Debug, Clone, Copy)]
pub struct IntersectionSolver {
    /// Radial residual at which the search stops
    tolerance: f64,
    /// Maximum number of halvings
    max_iterations: usize,
}

impl Default for IntersectionSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionSolver {
    /// Create a new solver with default parameters
    pub fn new() -> Self {
        Self {
            tolerance: BISECTION_TOLERANCE,
            max_iterations: BISECTION_MAX_ITERATIONS,
        }
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Find the point where the involute of `base_radius` crosses the circle of
    /// `target_radius`, searching roll angles in `[start_angle, end_angle]`.
    pub fn intersection_point(
        &self,
        base_radius: f64,
        target_radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> GearResult<DVec2> {
        let near = involute_point(base_radius, start_angle).length();
        let far = involute_point(base_radius, end_angle).length();
        if !(near.is_finite() && far.is_finite() && target_radius.is_finite()) {
            return Err(GearError::NumericConvergence(format!(
                "non-finite bracket for target radius {}",
                target_radius
            )));
        }
        if target_radius < near - self.tolerance || target_radius > far + self.tolerance {
            return Err(GearError::NumericConvergence(format!(
                "target radius {:.6} outside involute range [{:.6}, {:.6}]",
                target_radius, near, far
            )));
        }

        let (mut lo, mut hi) = (start_angle, end_angle);
        for iteration in 0..self.max_iterations {
            let mid = 0.5 * (lo + hi);
            let point = involute_point(base_radius, mid);
            let residual = point.length() - target_radius;

            if residual.abs() < self.tolerance {
                tracing::debug!(
                    "Involute meets r={:.4} at t={:.6} after {} iterations",
                    target_radius,
                    mid,
                    iteration + 1
                );
                return Ok(point);
            }

            if residual > 0.0 {
                // Midpoint outside the target circle
                hi = mid;
            } else if residual < 0.0 {
                lo = mid;
            } else {
                return Err(GearError::NumericConvergence(format!(
                    "residual is not a number at t={}",
                    mid
                )));
            }
        }

        Err(GearError::NumericConvergence(format!(
            "no intersection with r={} within {} iterations",
            target_radius, self.max_iterations
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use std::f64::consts::PI;

    #[test]
    fn test_involute_starts_on_base_circle() {
        let p = involute_point(10.0, 0.0);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.y, 10.0, epsilon = 1e-15);
    }

    #[test]
    fn test_involute_radius_is_monotone() {
        let mut last = 0.0;
        for k in 0..=20 {
            let r = involute_point(10.0, k as f64 * 0.05).length();
            assert!(r > last);
            assert_abs_diff_eq!(r, 10.0 * (1.0 + (k as f64 * 0.05).powi(2)).sqrt(), epsilon = 1e-12);
            last = r;
        }
    }

    #[test]
    fn test_bisection_known_case() {
        let solver = IntersectionSolver::new();
        let p = solver.intersection_point(10.0, 12.0, 0.0, PI / 3.0).unwrap();
        assert_abs_diff_eq!(p.length(), 12.0, epsilon = 1e-3);

        let again = solver.intersection_point(10.0, 12.0, 0.0, PI / 3.0).unwrap();
        assert_eq!(p, again);
    }

    #[test]
    fn test_bisection_tighter_tolerance() {
        let solver = IntersectionSolver::new()
            .with_tolerance(1e-9)
            .with_max_iterations(200);
        let p = solver.intersection_point(10.0, 12.0, 0.0, PI / 3.0).unwrap();
        assert_abs_diff_eq!(p.length(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bisection_rejects_unbracketed_target() {
        let solver = IntersectionSolver::new();
        // Inside the base circle
        let inside = solver.intersection_point(10.0, 9.0, 0.0, PI / 3.0);
        assert!(matches!(inside, Err(GearError::NumericConvergence(_))));
        // Beyond the end of the sweep
        let beyond = solver.intersection_point(10.0, 50.0, 0.0, PI / 3.0);
        assert!(matches!(beyond, Err(GearError::NumericConvergence(_))));
    }

    #[test]
    fn test_bisection_iteration_cap() {
        let solver = IntersectionSolver::new()
            .with_tolerance(1e-15)
            .with_max_iterations(3);
        let result = solver.intersection_point(10.0, 12.0, 0.0, PI / 3.0);
        assert!(matches!(result, Err(GearError::NumericConvergence(_))));
    }

    #[test]
    fn test_reflection_round_trip() {
        let axis = rotate(DVec2::new(0.3, 19.9), PI / 40.0);
        for k in 0..21 {
            let p = involute_point(18.794, k as f64 * 0.05);
            let mirrored = reflect_across_axis(p, axis);
            let back = reflect_across_axis(mirrored, axis);
            assert!(abs_diff_eq!(back.x, p.x, epsilon = 1e-9));
            assert!(abs_diff_eq!(back.y, p.y, epsilon = 1e-9));

            // Distance from the axis is preserved, side is flipped
            let normal = axis.normalize().perp();
            assert_abs_diff_eq!(p.dot(normal), -mirrored.dot(normal), epsilon = 1e-9);
            assert_abs_diff_eq!(p.length(), mirrored.length(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reflect_point_on_axis_is_fixed() {
        let axis = DVec2::new(1.0, 1.0);
        let p = DVec2::new(3.0, 3.0);
        assert_abs_diff_eq!(reflect_across_axis(p, axis).x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reflect_across_axis(p, axis).y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(DVec2::X, PI / 2.0);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_snap() {
        let p = snap(DVec2::new(1e-12, -2.0));
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, -2.0);
    }
}
