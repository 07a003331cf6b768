//! Feature Operations
//!
//! Descriptions of the sketch curves and solid features a gear build asks the
//! collaborator to create. Each description knows which collaborator call
//! realizes it; the collaborator owns the resulting geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::collaborator::{CadCollaborator, CollabResult, EntityId, FeatureId, PatternAxis};

/// A curve added to the open sketch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SketchCurve {
    /// Interpolated curve through an ordered point sequence
    InterpolatedCurve {
        /// Points the curve passes through
        points: Vec<DVec2>,
    },

    /// Straight segment
    Line {
        /// Start point
        start: DVec2,
        /// End point
        end: DVec2,
    },

    /// Circular arc
    Arc {
        /// Arc center
        center: DVec2,
        /// Start point
        start: DVec2,
        /// End point
        end: DVec2,
    },
}

impl SketchCurve {
    /// Get the type name of this curve
    pub fn type_name(&self) -> &'static str {
        match self {
            SketchCurve::InterpolatedCurve { .. } => "InterpolatedCurve",
            SketchCurve::Line { .. } => "Line",
            SketchCurve::Arc { .. } => "Arc",
        }
    }

    /// Issue the create call for this curve into the open sketch
    pub fn submit(&self, collaborator: &dyn CadCollaborator) -> CollabResult<()> {
        match self {
            SketchCurve::InterpolatedCurve { points } => {
                collaborator.create_interpolated_curve(points)
            }
            SketchCurve::Line { start, end } => collaborator.create_line(*start, *end),
            SketchCurve::Arc { center, start, end } => {
                collaborator.create_arc(*center, *start, *end)
            }
        }
    }
}

/// A solid feature created from committed sketches or features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolidFeature {
    /// Extrude a sketch into a new body
    Extrude {
        /// Name of the resulting feature
        name: String,
        /// Sketch entity to extrude
        sketch: EntityId,
        /// Extrusion height
        height: f64,
    },

    /// Extrude a sketch and subtract it from a body
    ExtrudeCut {
        /// Name of the resulting feature
        name: String,
        /// Sketch entity to extrude
        sketch: EntityId,
        /// Extrusion height
        height: f64,
        /// Body the cut is subtracted from
        target: EntityId,
    },

    /// Repeat a feature around an axis
    CircularPattern {
        /// Name of the resulting feature
        name: String,
        /// Feature to repeat
        feature: FeatureId,
        /// Rotation axis
        axis: PatternAxis,
        /// Angle covered by all instances, in degrees
        total_angle_degrees: f64,
        /// Number of instances including the original
        instances: u32,
    },
}

impl SolidFeature {
    /// Get the name of this feature
    pub fn name(&self) -> &str {
        match self {
            SolidFeature::Extrude { name, .. } => name,
            SolidFeature::ExtrudeCut { name, .. } => name,
            SolidFeature::CircularPattern { name, .. } => name,
        }
    }

    /// Get the type name of this feature
    pub fn type_name(&self) -> &'static str {
        match self {
            SolidFeature::Extrude { .. } => "Extrude",
            SolidFeature::ExtrudeCut { .. } => "ExtrudeCut",
            SolidFeature::CircularPattern { .. } => "CircularPattern",
        }
    }

    /// Issue the create call for this feature
    pub fn submit(&self, collaborator: &dyn CadCollaborator) -> CollabResult<()> {
        match self {
            SolidFeature::Extrude {
                name,
                sketch,
                height,
            } => collaborator.extrude(*sketch, *height, name),
            SolidFeature::ExtrudeCut {
                name,
                sketch,
                height,
                target,
            } => collaborator.extrude_cut(*sketch, *height, *target, name),
            SolidFeature::CircularPattern {
                name,
                feature,
                axis,
                total_angle_degrees,
                instances,
            } => collaborator.circular_pattern(*feature, *axis, *total_angle_degrees, *instances, name),
        }
    }
}
