//! Tooth Profile Synthesis
//!
//! Turns validated [`GearParameters`] into the closed outline of one tooth gap:
//! two involute flanks mirrored across the tooth axis, the top line joining
//! their outer ends, the root arc, and (when the flanks stop short of the root)
//! two connector segments. The profile also records which fillet topology the
//! build must apply once the outline exists in the host sketch.

mod fillet;
mod involute;

pub use fillet::{FilletPlan, SketchElement};
pub use involute::{IntersectionSolver, involute_point, reflect_across_axis, rotate, snap};

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BISECTION_MAX_ITERATIONS, BISECTION_TOLERANCE, INVOLUTE_SAMPLE_STEP, INVOLUTE_SWEEP_ANGLE,
};
use crate::error::{GearError, GearResult};
use crate::feature::SketchCurve;
use crate::params::GearParameters;

/// Tunable settings of the involute sweep and intersection search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// Upper bound of the involute roll angle (radians)
    pub sweep_angle: f64,
    /// Roll angle increment between flank samples (radians)
    pub sample_step: f64,
    /// Radial tolerance of the intersection search
    pub tolerance: f64,
    /// Iteration cap of the intersection search
    pub max_iterations: usize,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            sweep_angle: INVOLUTE_SWEEP_ANGLE,
            sample_step: INVOLUTE_SAMPLE_STEP,
            tolerance: BISECTION_TOLERANCE,
            max_iterations: BISECTION_MAX_ITERATIONS,
        }
    }
}

impl SynthesisSettings {
    /// Check that the sweep can produce samples and the search can terminate
    pub fn validate(&self) -> GearResult<()> {
        if !self.sweep_angle.is_finite() || self.sweep_angle <= 0.0 {
            return Err(GearError::InvalidParameter(format!(
                "sweep angle must be positive, got {}",
                self.sweep_angle
            )));
        }
        if !self.sample_step.is_finite()
            || self.sample_step <= 0.0
            || self.sample_step >= self.sweep_angle
        {
            return Err(GearError::InvalidParameter(format!(
                "sample step must lie in (0, {}), got {}",
                self.sweep_angle, self.sample_step
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GearError::InvalidParameter(format!(
                "search tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(GearError::InvalidParameter(
                "search needs at least one iteration".into(),
            ));
        }
        Ok(())
    }

    /// Intersection solver configured from these settings
    pub fn solver(&self) -> IntersectionSolver {
        IntersectionSolver::new()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
    }

    /// Roll angles sampled along the flank, `k * step` for every `k` below the sweep bound
    pub fn sample_angles(&self) -> impl Iterator<Item = f64> + '_ {
        (0u32..)
            .map(|k| k as f64 * self.sample_step)
            .take_while(|t| *t < self.sweep_angle)
    }
}

/// How the flank meets the root circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootKind {
    /// Base circle outside the root circle; the flank starts on the base circle
    ContinuousSweep,
    /// Root circle outside the base circle; the flank starts on the root circle
    PointedRoot,
}

/// Which curves the root fillets blend against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilletTopology {
    /// Straight connectors from each flank down to the root arc
    ConnectorSegments,
    /// The flank curves themselves
    FlankCurves,
}

/// The synthesized outline of one tooth gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToothProfile {
    /// Right flank points, root side first
    pub right_flank: Vec<DVec2>,
    /// Left flank points, each the reflection of the right flank point across the tooth axis
    pub left_flank: Vec<DVec2>,
    /// Root arc end on the right side
    pub root_start: DVec2,
    /// Root arc end on the left side
    pub root_end: DVec2,
    /// Where the right flank crosses the shifted dividing circle
    pub pitch_point: DVec2,
    /// Point on the tooth axis (pitch point rotated by half the angular pitch)
    pub axis_point: DVec2,
    pub root_kind: RootKind,
    pub fillet_topology: FilletTopology,
    /// Gap between the first flank point and the root arc
    pub delta: f64,
    pub fillet_radius: f64,
}

impl ToothProfile {
    /// Whether connector segments are part of the outline
    pub fn has_connectors(&self) -> bool {
        self.fillet_topology == FilletTopology::ConnectorSegments
    }

    /// Sketch curves of the cut outline in creation order
    pub fn sketch_curves(&self) -> Vec<SketchCurve> {
        let mut curves = Vec::with_capacity(6);
        curves.push(SketchCurve::InterpolatedCurve {
            points: self.right_flank.clone(),
        });
        curves.push(SketchCurve::InterpolatedCurve {
            points: self.left_flank.clone(),
        });

        if let (Some(&left_tip), Some(&right_tip)) =
            (self.left_flank.last(), self.right_flank.last())
        {
            curves.push(SketchCurve::Line {
                start: left_tip,
                end: right_tip,
            });
        }

        curves.push(SketchCurve::Arc {
            center: DVec2::ZERO,
            start: self.root_start,
            end: self.root_end,
        });

        if self.has_connectors()
            && let (Some(&right_root), Some(&left_root)) =
                (self.right_flank.first(), self.left_flank.first())
        {
            curves.push(SketchCurve::Line {
                start: right_root,
                end: self.root_start,
            });
            curves.push(SketchCurve::Line {
                start: left_root,
                end: self.root_end,
            });
        }

        curves
    }
}

/// Builds tooth-gap profiles from gear parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSynthesizer {
    settings: SynthesisSettings,
}

impl ProfileSynthesizer {
    /// Create a synthesizer with the default sweep settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synthesizer with custom sweep settings
    pub fn with_settings(settings: SynthesisSettings) -> Self {
        Self { settings }
    }

    /// Synthesize the cut profile of one tooth gap
    pub fn build_cut_profile(&self, params: &GearParameters) -> GearResult<ToothProfile> {
        self.settings.validate()?;
        let solver = self.settings.solver();
        let sweep = self.settings.sweep_angle;
        let base_radius = params.base_radius();
        let dedendum_radius = params.dedendum_radius();

        let pitch_point =
            solver.intersection_point(base_radius, params.shifted_dividing_radius(), 0.0, sweep)?;
        let half_pitch = PI / (2.0 * params.teeth() as f64);
        let axis_point = rotate(pitch_point, half_pitch);

        let (root_kind, root_point, right_flank) = if params.base_outside_root() {
            let flank: Vec<DVec2> = self
                .settings
                .sample_angles()
                .map(|t| snap(involute_point(base_radius, t)))
                .collect();
            // The involute never dips below the base circle; project its start radially
            let root_point = DVec2::new(0.0, dedendum_radius);
            (RootKind::ContinuousSweep, root_point, flank)
        } else {
            let start = snap(solver.intersection_point(base_radius, dedendum_radius, 0.0, sweep)?);
            // The search may stop just outside the root circle; keep radii increasing
            let start_radius = start.length();
            let mut flank = vec![start];
            flank.extend(
                self.settings
                    .sample_angles()
                    .map(|t| involute_point(base_radius, t))
                    .filter(|p| p.length() > start_radius)
                    .map(snap),
            );
            (RootKind::PointedRoot, start, flank)
        };

        if right_flank.len() < 2 {
            return Err(GearError::ProfileTopology(format!(
                "flank has {} point(s) above the root circle, need at least 2",
                right_flank.len()
            )));
        }

        let left_flank: Vec<DVec2> = right_flank
            .iter()
            .map(|p| snap(reflect_across_axis(*p, axis_point)))
            .collect();
        let root_start = snap(root_point);
        let root_end = snap(reflect_across_axis(root_point, axis_point));

        let delta = right_flank[0].distance(root_start);
        let fillet_radius = params.fillet_radius();
        let fillet_topology = if delta > fillet_radius {
            FilletTopology::ConnectorSegments
        } else {
            FilletTopology::FlankCurves
        };

        tracing::debug!(
            "Profile for z={} m={}: {:?}, {} flank points, delta {:.4} vs fillet {:.4} -> {:?}",
            params.teeth(),
            params.module(),
            root_kind,
            right_flank.len(),
            delta,
            fillet_radius,
            fillet_topology
        );

        Ok(ToothProfile {
            right_flank,
            left_flank,
            root_start,
            root_end,
            pitch_point,
            axis_point,
            root_kind,
            fillet_topology,
            delta,
            fillet_radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GearInputs;
    use approx::assert_abs_diff_eq;

    fn profile(inputs: GearInputs) -> ToothProfile {
        let params = GearParameters::new(inputs).unwrap();
        ProfileSynthesizer::new().build_cut_profile(&params).unwrap()
    }

    #[test]
    fn test_reference_gear_profile() {
        let p = profile(GearInputs::standard(20, 2.0).with_fillet_coefficient(0.38));

        assert_eq!(p.root_kind, RootKind::ContinuousSweep);
        assert_eq!(p.right_flank.len(), 21);
        assert_eq!(p.left_flank.len(), 21);
        assert_eq!(p.right_flank[0].x, 0.0);
        assert_abs_diff_eq!(p.right_flank[0].y, 18.793852, epsilon = 1e-6);
        assert_eq!(p.root_start, DVec2::new(0.0, 17.5));
        assert_abs_diff_eq!(p.pitch_point.length(), 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p.delta, 1.293852, epsilon = 1e-6);
        assert_abs_diff_eq!(p.fillet_radius, 0.76, epsilon = 1e-12);
        assert_eq!(p.fillet_topology, FilletTopology::ConnectorSegments);
    }

    #[test]
    fn test_reference_gear_flank_is_deterministic() {
        let a = profile(GearInputs::standard(20, 2.0));
        let b = profile(GearInputs::standard(20, 2.0));
        assert_eq!(a, b);

        for (k, p) in a.right_flank.iter().enumerate() {
            let expected = involute_point(a.right_flank[0].y, k as f64 * 0.05);
            assert_abs_diff_eq!(p.x, expected.x, epsilon = 1e-10);
            assert_abs_diff_eq!(p.y, expected.y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_left_flank_mirrors_right_flank() {
        let p = profile(GearInputs::standard(20, 2.0));
        for (right, left) in p.right_flank.iter().zip(&p.left_flank) {
            let back = reflect_across_axis(*left, p.axis_point);
            assert_abs_diff_eq!(back.x, right.x, epsilon = 1e-9);
            assert_abs_diff_eq!(back.y, right.y, epsilon = 1e-9);
        }
        assert!(p.left_flank.iter().all(|q| q.x < 0.0));
    }

    #[test]
    fn test_axis_is_half_pitch_from_pitch_point() {
        let p = profile(GearInputs::standard(20, 2.0));
        let angle = p.axis_point.y.atan2(p.axis_point.x) - p.pitch_point.y.atan2(p.pitch_point.x);
        assert_abs_diff_eq!(angle, PI / 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pointed_root_branch() {
        // z = 42, m = 1: root circle 19.75 lies outside base circle 19.73
        let params = GearParameters::new(GearInputs::standard(42, 1.0)).unwrap();
        assert!(!params.base_outside_root());

        let p = ProfileSynthesizer::new().build_cut_profile(&params).unwrap();
        assert_eq!(p.root_kind, RootKind::PointedRoot);
        assert_eq!(p.root_start, p.right_flank[0]);
        assert_abs_diff_eq!(p.right_flank[0].length(), 19.75, epsilon = 1e-3);
        assert!(
            p.right_flank[1..]
                .iter()
                .all(|q| q.length() > params.dedendum_radius())
        );
        assert_eq!(p.delta, 0.0);
        assert_eq!(p.fillet_topology, FilletTopology::FlankCurves);
    }

    #[test]
    fn test_pointed_root_flank_radii_increase() {
        // Each search lands slightly outside the root circle, past a flank sample
        let loose = SynthesisSettings {
            tolerance: 0.05,
            ..Default::default()
        };
        let cases = [
            (GearInputs::standard(86, 1.0).with_profile_shift(-0.1), SynthesisSettings::default()),
            (GearInputs::standard(132, 1.0), SynthesisSettings::default()),
            (GearInputs::standard(42, 1.0), loose),
        ];

        for (inputs, settings) in cases {
            let params = GearParameters::new(inputs).unwrap();
            let p = ProfileSynthesizer::with_settings(settings)
                .build_cut_profile(&params)
                .unwrap();
            assert_eq!(p.root_kind, RootKind::PointedRoot);
            assert!(p.right_flank[0].length() >= params.dedendum_radius());
            for pair in p.right_flank.windows(2) {
                assert!(
                    pair[1].length() > pair[0].length(),
                    "z={} flank radius drops from {} to {}",
                    params.teeth(),
                    pair[0].length(),
                    pair[1].length()
                );
            }
        }
    }

    #[test]
    fn test_small_gap_blends_against_flanks() {
        // z = 40, m = 1: base 18.794 barely clears root 18.75
        let p = profile(GearInputs::standard(40, 1.0));
        assert_eq!(p.root_kind, RootKind::ContinuousSweep);
        assert!(p.delta < p.fillet_radius);
        assert_eq!(p.fillet_topology, FilletTopology::FlankCurves);
        assert!(!p.has_connectors());
        assert_eq!(p.sketch_curves().len(), 4);
    }

    #[test]
    fn test_sketch_curve_order_with_connectors() {
        let p = profile(GearInputs::standard(20, 2.0));
        let curves = p.sketch_curves();
        assert_eq!(curves.len(), 6);

        assert!(matches!(curves[0], SketchCurve::InterpolatedCurve { .. }));
        assert!(matches!(curves[1], SketchCurve::InterpolatedCurve { .. }));
        assert_eq!(
            curves[2],
            SketchCurve::Line {
                start: p.left_flank[20],
                end: p.right_flank[20],
            }
        );
        assert_eq!(
            curves[3],
            SketchCurve::Arc {
                center: DVec2::ZERO,
                start: p.root_start,
                end: p.root_end,
            }
        );
        assert_eq!(
            curves[4],
            SketchCurve::Line {
                start: p.right_flank[0],
                end: p.root_start,
            }
        );
        assert_eq!(
            curves[5],
            SketchCurve::Line {
                start: p.left_flank[0],
                end: p.root_end,
            }
        );
    }

    #[test]
    fn test_catalogue_fillets_on_reference_gear() {
        for coefficient in crate::constants::FILLET_COEFFICIENTS {
            let p = profile(GearInputs::standard(20, 2.0).with_fillet_coefficient(coefficient));
            assert_abs_diff_eq!(p.fillet_radius, 2.0 * coefficient, epsilon = 1e-12);
            assert_eq!(p.fillet_topology, FilletTopology::ConnectorSegments);
        }
    }

    #[test]
    fn test_negative_shift_below_base_circle_fails() {
        // Shifted dividing radius 20 - 2 * 1.2 = 17.6 is inside the base circle
        let params =
            GearParameters::new(GearInputs::standard(20, 2.0).with_profile_shift(-1.2)).unwrap();
        let result = ProfileSynthesizer::new().build_cut_profile(&params);
        assert!(matches!(result, Err(GearError::NumericConvergence(_))));
    }

    #[test]
    fn test_invalid_settings() {
        let params = GearParameters::new(GearInputs::default()).unwrap();
        let settings = SynthesisSettings {
            sample_step: 0.0,
            ..Default::default()
        };
        let result = ProfileSynthesizer::with_settings(settings).build_cut_profile(&params);
        assert!(matches!(result, Err(GearError::InvalidParameter(_))));
    }

    #[test]
    fn test_sample_angles() {
        let settings = SynthesisSettings::default();
        let angles: Vec<f64> = settings.sample_angles().collect();
        assert_eq!(angles.len(), 21);
        assert_eq!(angles[0], 0.0);
        assert!(*angles.last().unwrap() < INVOLUTE_SWEEP_ANGLE);
    }
}
