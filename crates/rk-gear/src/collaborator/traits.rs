//! CAD collaborator trait definitions
//!
//! The command/query interface the gear build needs from the host CAD system.
//! Sketches, elements and solid features are owned by the collaborator; the
//! build only refers to them by opaque id or by feature name.

use std::fmt;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a sketch element (line, arc, curve) owned by the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

/// Identifier of a modeling entity (sketch or body) owned by the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

/// Identifier of a feature in the collaborator's feature tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub Uuid);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element:{}", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature:{}", self.0)
    }
}

/// Datum plane a sketch is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatumRef(pub u32);

impl Default for DatumRef {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_DATUM)
    }
}

/// Tangency/trim mode code passed through to fillet creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TangencyMode(pub u8);

impl TangencyMode {
    /// Trim both curves back to the fillet tangency points
    pub const TRIM: Self = Self(2);
}

/// Geometric type of a sketch element, decoded from the host's type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Straight line segment (code 10)
    Segment,
    /// Circular arc (code 12)
    Arc,
    /// Interpolated spline through points (code 15)
    InterpolatedCurve,
    /// Any other element type
    Other(u32),
}

impl ElementKind {
    pub const SEGMENT_CODE: u32 = 10;
    pub const ARC_CODE: u32 = 12;
    pub const INTERPOLATED_CURVE_CODE: u32 = 15;

    /// Decode a host type code
    pub fn from_code(code: u32) -> Self {
        match code {
            Self::SEGMENT_CODE => ElementKind::Segment,
            Self::ARC_CODE => ElementKind::Arc,
            Self::INTERPOLATED_CURVE_CODE => ElementKind::InterpolatedCurve,
            other => ElementKind::Other(other),
        }
    }

    /// Host type code for this kind
    pub fn code(&self) -> u32 {
        match self {
            ElementKind::Segment => Self::SEGMENT_CODE,
            ElementKind::Arc => Self::ARC_CODE,
            ElementKind::InterpolatedCurve => Self::INTERPOLATED_CURVE_CODE,
            ElementKind::Other(code) => *code,
        }
    }
}

/// A sketch element as reported by an element query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Collaborator-assigned id
    pub id: ElementId,
    /// Raw host type code
    pub type_code: u32,
    /// Start point, if the element has one
    pub start_point: Option<DVec2>,
    /// End point, if the element has one
    pub end_point: Option<DVec2>,
}

impl ElementRecord {
    /// Create a new element record
    pub fn new(id: ElementId, kind: ElementKind, start: DVec2, end: DVec2) -> Self {
        Self {
            id,
            type_code: kind.code(),
            start_point: Some(start),
            end_point: Some(end),
        }
    }

    /// Decoded element kind
    pub fn kind(&self) -> ElementKind {
        ElementKind::from_code(self.type_code)
    }
}

/// Axis of a circular pattern, given by two 3D points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternAxis {
    /// First point on the axis
    pub start: DVec3,
    /// Second point on the axis
    pub end: DVec3,
}

impl PatternAxis {
    /// Create an axis through two points
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Z axis through the origin, second point at the given height
    pub fn z(height: f64) -> Self {
        Self::new(DVec3::ZERO, DVec3::new(0.0, 0.0, height))
    }

    /// Unit direction of the axis, if the points are distinct
    pub fn direction(&self) -> Option<DVec3> {
        (self.end - self.start).try_normalize()
    }
}

/// Error type for collaborator calls
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("Collaborator not available: {0}")]
    Unavailable(String),

    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Command out of sequence: {0}")]
    OutOfSequence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Result type for collaborator calls
pub type CollabResult<T> = Result<T, CollaboratorError>;

/// The host CAD command/query interface
///
/// Creation calls are buffered by the host until [`CadCollaborator::execute`]
/// commits them; the buffer must then be emptied with
/// [`CadCollaborator::clear_command`] before new commands are issued. Queries
/// only see committed state. Every call is a blocking round-trip.
pub trait CadCollaborator: Send + Sync {
    /// Get the name of this collaborator
    fn name(&self) -> &str;

    /// Check if the collaborator is connected
    fn is_available(&self) -> bool;

    // ========== Sketch Commands ==========

    /// Open a new sketch on a datum plane
    fn create_sketch(&self, name: &str, datum: DatumRef) -> CollabResult<()>;

    /// Add a full circle given its center and a point on it
    fn create_circle(&self, center: DVec2, radius_point: DVec2) -> CollabResult<()>;

    /// Add an interpolated curve through the given points
    fn create_interpolated_curve(&self, points: &[DVec2]) -> CollabResult<()>;

    /// Add a straight segment
    fn create_line(&self, start: DVec2, end: DVec2) -> CollabResult<()>;

    /// Add a circular arc by center, start and end
    fn create_arc(&self, center: DVec2, start: DVec2, end: DVec2) -> CollabResult<()>;

    /// Close the open sketch
    fn exit_sketch(&self) -> CollabResult<()>;

    /// Reopen a committed sketch by name
    fn edit_sketch(&self, name: &str) -> CollabResult<()>;

    /// Blend two existing curves with a fillet arc
    fn create_fillet_curve(
        &self,
        curve_a: ElementId,
        curve_b: ElementId,
        radius: f64,
        mode_a: TangencyMode,
        mode_b: TangencyMode,
    ) -> CollabResult<()>;

    // ========== Queries ==========

    /// All sketch elements of the named features
    fn query_elements_by_feature_name(&self, names: &[&str]) -> CollabResult<Vec<ElementRecord>>;

    /// Modeling entities created by the named features
    fn query_entities_by_feature_name(&self, names: &[&str]) -> CollabResult<Vec<EntityId>>;

    /// Features with the given names
    fn query_features_by_name(&self, names: &[&str]) -> CollabResult<Vec<FeatureId>>;

    // ========== Solid Commands ==========

    /// Extrude a sketch into a new body
    fn extrude(&self, sketch: EntityId, height: f64, output_name: &str) -> CollabResult<()>;

    /// Extrude a sketch and subtract it from a target body
    fn extrude_cut(
        &self,
        sketch: EntityId,
        height: f64,
        target: EntityId,
        output_name: &str,
    ) -> CollabResult<()>;

    /// Repeat a feature around an axis
    fn circular_pattern(
        &self,
        feature: FeatureId,
        axis: PatternAxis,
        total_angle_degrees: f64,
        instance_count: u32,
        output_name: &str,
    ) -> CollabResult<()>;

    // ========== Command Buffer ==========

    /// Submit buffered commands and wait for confirmation
    fn execute(&self, commit_and_hold: bool) -> CollabResult<()>;

    /// Empty the command buffer
    fn clear_command(&self) -> CollabResult<()>;
}

/// A null collaborator that always returns errors (used when no host is connected)
#[derive(Debug, Default)]
pub struct NullCollaborator;

impl NullCollaborator {
    fn unavailable<T>() -> CollabResult<T> {
        Err(CollaboratorError::Unavailable(
            "No CAD collaborator connected".into(),
        ))
    }
}

impl CadCollaborator for NullCollaborator {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_sketch(&self, _name: &str, _datum: DatumRef) -> CollabResult<()> {
        Self::unavailable()
    }

    fn create_circle(&self, _center: DVec2, _radius_point: DVec2) -> CollabResult<()> {
        Self::unavailable()
    }

    fn create_interpolated_curve(&self, _points: &[DVec2]) -> CollabResult<()> {
        Self::unavailable()
    }

    fn create_line(&self, _start: DVec2, _end: DVec2) -> CollabResult<()> {
        Self::unavailable()
    }

    fn create_arc(&self, _center: DVec2, _start: DVec2, _end: DVec2) -> CollabResult<()> {
        Self::unavailable()
    }

    fn exit_sketch(&self) -> CollabResult<()> {
        Self::unavailable()
    }

    fn edit_sketch(&self, _name: &str) -> CollabResult<()> {
        Self::unavailable()
    }

    fn create_fillet_curve(
        &self,
        _curve_a: ElementId,
        _curve_b: ElementId,
        _radius: f64,
        _mode_a: TangencyMode,
        _mode_b: TangencyMode,
    ) -> CollabResult<()> {
        Self::unavailable()
    }

    fn query_elements_by_feature_name(&self, _names: &[&str]) -> CollabResult<Vec<ElementRecord>> {
        Self::unavailable()
    }

    fn query_entities_by_feature_name(&self, _names: &[&str]) -> CollabResult<Vec<EntityId>> {
        Self::unavailable()
    }

    fn query_features_by_name(&self, _names: &[&str]) -> CollabResult<Vec<FeatureId>> {
        Self::unavailable()
    }

    fn extrude(&self, _sketch: EntityId, _height: f64, _output_name: &str) -> CollabResult<()> {
        Self::unavailable()
    }

    fn extrude_cut(
        &self,
        _sketch: EntityId,
        _height: f64,
        _target: EntityId,
        _output_name: &str,
    ) -> CollabResult<()> {
        Self::unavailable()
    }

    fn circular_pattern(
        &self,
        _feature: FeatureId,
        _axis: PatternAxis,
        _total_angle_degrees: f64,
        _instance_count: u32,
        _output_name: &str,
    ) -> CollabResult<()> {
        Self::unavailable()
    }

    fn execute(&self, _commit_and_hold: bool) -> CollabResult<()> {
        Self::unavailable()
    }

    fn clear_command(&self) -> CollabResult<()> {
        Self::unavailable()
    }
}
