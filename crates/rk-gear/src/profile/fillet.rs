//! Fillet Pair Selection
//!
//! Identifies, among the elements of the committed cut sketch, the root arc
//! and the two curves (connector segments or flank curves) that the root
//! fillets blend against.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::FilletTopology;
use crate::collaborator::{CollaboratorError, ElementId, ElementKind, ElementRecord};
use crate::constants::SNAP_EPSILON;
use crate::error::{GearError, GearResult};

/// A typed sketch element decoded from a collaborator element record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SketchElement {
    /// Circular arc (root arc or fillet)
    Arc {
        /// Element id
        id: ElementId,
    },
    /// Straight segment
    Segment {
        /// Element id
        id: ElementId,
        /// Start point
        start: DVec2,
        /// End point
        end: DVec2,
    },
    /// Interpolated curve
    InterpolatedCurve {
        /// Element id
        id: ElementId,
        /// First interpolation point
        start: DVec2,
        /// Last interpolation point
        end: DVec2,
    },
}

impl SketchElement {
    /// Decode a record; element types the build does not use yield `None`
    pub fn from_record(record: &ElementRecord) -> GearResult<Option<Self>> {
        let endpoints = || -> GearResult<(DVec2, DVec2)> {
            match (record.start_point, record.end_point) {
                (Some(start), Some(end)) => Ok((start, end)),
                _ => Err(CollaboratorError::Malformed(format!(
                    "element {} of type {} has no end points",
                    record.id, record.type_code
                ))
                .into()),
            }
        };

        let element = match record.kind() {
            ElementKind::Arc => SketchElement::Arc { id: record.id },
            ElementKind::Segment => {
                let (start, end) = endpoints()?;
                SketchElement::Segment {
                    id: record.id,
                    start,
                    end,
                }
            }
            ElementKind::InterpolatedCurve => {
                let (start, end) = endpoints()?;
                SketchElement::InterpolatedCurve {
                    id: record.id,
                    start,
                    end,
                }
            }
            ElementKind::Other(_) => return Ok(None),
        };
        Ok(Some(element))
    }
}

/// The two fillets to create in the cut sketch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilletPlan {
    /// Topology the pairs were selected for
    pub topology: FilletTopology,
    /// Root arc shared by both fillets
    pub root_arc: ElementId,
    /// Curve on the right flank side
    pub right: ElementId,
    /// Curve on the left flank side
    pub left: ElementId,
    /// Fillet radius
    pub radius: f64,
}

impl FilletPlan {
    /// Select the fillet pairs from the elements of the cut sketch
    pub fn select(
        topology: FilletTopology,
        radius: f64,
        records: &[ElementRecord],
    ) -> GearResult<Self> {
        let mut elements = Vec::with_capacity(records.len());
        for record in records {
            if let Some(element) = SketchElement::from_record(record)? {
                elements.push(element);
            }
        }

        let root_arc = single(
            elements.iter().filter_map(|e| match e {
                SketchElement::Arc { id } => Some(*id),
                _ => None,
            }),
            "root arc",
        )?;

        let (right, left) = match topology {
            FilletTopology::ConnectorSegments => connector_pair(&elements)?,
            FilletTopology::FlankCurves => flank_pair(&elements)?,
        };

        tracing::debug!(
            "Fillet pairs ({:?}): arc {} with {} and {}",
            topology,
            root_arc,
            right,
            left
        );

        Ok(Self {
            topology,
            root_arc,
            right,
            left,
            radius,
        })
    }

    /// Curve pairs in the order the fillets are created
    pub fn pairs(&self) -> [(ElementId, ElementId); 2] {
        [(self.root_arc, self.right), (self.root_arc, self.left)]
    }
}

/// Exactly one candidate, otherwise a topology error naming `what`
fn single(mut candidates: impl Iterator<Item = ElementId>, what: &str) -> GearResult<ElementId> {
    let first = candidates
        .next()
        .ok_or_else(|| GearError::ProfileTopology(format!("no {} in cut sketch", what)))?;
    if candidates.next().is_some() {
        return Err(GearError::ProfileTopology(format!(
            "more than one {} in cut sketch",
            what
        )));
    }
    Ok(first)
}

/// Right connector starts on the Y axis; left connector lies entirely at x < 0
fn connector_pair(elements: &[SketchElement]) -> GearResult<(ElementId, ElementId)> {
    let segments: Vec<(ElementId, DVec2, DVec2)> = elements
        .iter()
        .filter_map(|e| match e {
            SketchElement::Segment { id, start, end } => Some((*id, *start, *end)),
            _ => None,
        })
        .collect();

    let right = single(
        segments
            .iter()
            .filter(|(_, start, _)| start.x.abs() <= SNAP_EPSILON)
            .map(|(id, _, _)| *id),
        "right connector segment",
    )?;
    let left = single(
        segments
            .iter()
            .filter(|(id, start, end)| *id != right && start.x < 0.0 && end.x < 0.0)
            .map(|(id, _, _)| *id),
        "left connector segment",
    )?;
    Ok((right, left))
}

/// The flank curve starting further to +X is the right flank
fn flank_pair(elements: &[SketchElement]) -> GearResult<(ElementId, ElementId)> {
    let curves: Vec<(ElementId, DVec2)> = elements
        .iter()
        .filter_map(|e| match e {
            SketchElement::InterpolatedCurve { id, start, .. } => Some((*id, *start)),
            _ => None,
        })
        .collect();

    let [(a_id, a_start), (b_id, b_start)] = curves.as_slice() else {
        return Err(GearError::ProfileTopology(format!(
            "expected 2 flank curves in cut sketch, found {}",
            curves.len()
        )));
    };

    if a_start.x > b_start.x {
        Ok((*a_id, *b_id))
    } else if b_start.x > a_start.x {
        Ok((*b_id, *a_id))
    } else {
        Err(GearError::ProfileTopology(
            "flank curves start at the same x coordinate".into(),
        ))
    }
}
