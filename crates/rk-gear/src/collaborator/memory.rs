//! In-memory CAD collaborator
//!
//! Models the host's stateful command buffer without any geometry kernel:
//! sketch and solid commands are staged until `execute`, committed features
//! become queryable by name, and the buffer must be cleared before new
//! commands are accepted. Every accepted call is appended to a journal.

use std::collections::{HashMap, HashSet};

use glam::DVec2;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use super::{
    CadCollaborator, CollabResult, CollaboratorError, DatumRef, ElementId, ElementKind,
    ElementRecord, EntityId, FeatureId, PatternAxis, TangencyMode,
};

/// Type code the in-memory collaborator reports for full circles
pub const CIRCLE_TYPE_CODE: u32 = 11;

/// A call accepted by the in-memory collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum Command {
    CreateSketch {
        name: String,
        datum: DatumRef,
    },
    CreateCircle {
        center: DVec2,
        radius_point: DVec2,
    },
    CreateInterpolatedCurve {
        points: Vec<DVec2>,
    },
    CreateLine {
        start: DVec2,
        end: DVec2,
    },
    CreateArc {
        center: DVec2,
        start: DVec2,
        end: DVec2,
    },
    ExitSketch,
    EditSketch {
        name: String,
    },
    CreateFilletCurve {
        curve_a: ElementId,
        curve_b: ElementId,
        radius: f64,
        mode_a: TangencyMode,
        mode_b: TangencyMode,
    },
    QueryElements {
        names: Vec<String>,
    },
    QueryEntities {
        names: Vec<String>,
    },
    QueryFeatures {
        names: Vec<String>,
    },
    Extrude {
        sketch: EntityId,
        height: f64,
        output_name: String,
    },
    ExtrudeCut {
        sketch: EntityId,
        height: f64,
        target: EntityId,
        output_name: String,
    },
    CircularPattern {
        feature: FeatureId,
        axis: PatternAxis,
        total_angle_degrees: f64,
        instance_count: u32,
        output_name: String,
    },
    Execute {
        commit_and_hold: bool,
    },
    ClearCommand,
}

impl Command {
    /// Operation name used for failure injection and logging
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CreateSketch { .. } => "create_sketch",
            Command::CreateCircle { .. } => "create_circle",
            Command::CreateInterpolatedCurve { .. } => "create_interpolated_curve",
            Command::CreateLine { .. } => "create_line",
            Command::CreateArc { .. } => "create_arc",
            Command::ExitSketch => "exit_sketch",
            Command::EditSketch { .. } => "edit_sketch",
            Command::CreateFilletCurve { .. } => "create_fillet_curve",
            Command::QueryElements { .. } => "query_elements_by_feature_name",
            Command::QueryEntities { .. } => "query_entities_by_feature_name",
            Command::QueryFeatures { .. } => "query_features_by_name",
            Command::Extrude { .. } => "extrude",
            Command::ExtrudeCut { .. } => "extrude_cut",
            Command::CircularPattern { .. } => "circular_pattern",
            Command::Execute { .. } => "execute",
            Command::ClearCommand => "clear_command",
        }
    }

    /// Whether this call goes into the command buffer
    pub fn is_buffered(&self) -> bool {
        !matches!(
            self,
            Command::QueryElements { .. }
                | Command::QueryEntities { .. }
                | Command::QueryFeatures { .. }
                | Command::Execute { .. }
                | Command::ClearCommand
        )
    }
}

/// A sketch being drawn or edited
#[derive(Debug, Clone)]
struct SketchDraft {
    name: String,
    elements: Vec<ElementRecord>,
}

/// Work staged in the command buffer, applied on execute
#[derive(Debug, Clone)]
enum Staged {
    Sketch(SketchDraft),
    Feature(String),
}

/// A committed, name-addressable feature
#[derive(Debug, Clone)]
struct NamedFeature {
    entity: EntityId,
    feature: FeatureId,
    elements: Vec<ElementRecord>,
}

#[derive(Debug, Default)]
struct State {
    open_sketch: Option<SketchDraft>,
    staged: Vec<Staged>,
    buffered: usize,
    awaiting_clear: bool,
    committed: HashMap<String, NamedFeature>,
    journal: Vec<Command>,
    armed_failures: HashSet<String>,
    executions: usize,
}

impl State {
    fn check_armed(&self, op: &str) -> CollabResult<()> {
        if self.armed_failures.contains(op) {
            return Err(CollaboratorError::CommandRejected(format!(
                "{} failed on host",
                op
            )));
        }
        Ok(())
    }

    /// Gate for every buffered command
    fn accept(&mut self, command: &Command) -> CollabResult<()> {
        self.check_armed(command.op_name())?;
        if self.awaiting_clear {
            return Err(CollaboratorError::OutOfSequence(format!(
                "{} issued before the previous commit was cleared",
                command.op_name()
            )));
        }
        Ok(())
    }

    fn record(&mut self, command: Command) {
        if command.is_buffered() {
            self.buffered += 1;
        }
        self.journal.push(command);
    }

    fn draft_mut(&mut self, op: &str) -> CollabResult<&mut SketchDraft> {
        self.open_sketch
            .as_mut()
            .ok_or_else(|| CollaboratorError::OutOfSequence(format!("{} without an open sketch", op)))
    }

    fn add_element(&mut self, op: &str, kind: ElementKind, start: DVec2, end: DVec2) -> CollabResult<()> {
        let draft = self.draft_mut(op)?;
        draft.elements.push(ElementRecord::new(
            ElementId(Uuid::new_v4()),
            kind,
            start,
            end,
        ));
        Ok(())
    }

    fn lookup(&self, name: &str) -> CollabResult<&NamedFeature> {
        self.committed
            .get(name)
            .ok_or_else(|| CollaboratorError::NotFound(format!("no committed feature named {}", name)))
    }

    fn entity_exists(&self, entity: EntityId) -> bool {
        self.committed.values().any(|f| f.entity == entity)
    }

    fn feature_exists(&self, feature: FeatureId) -> bool {
        self.committed.values().any(|f| f.feature == feature)
    }
}

/// Collaborator that keeps all host state in memory
#[derive(Debug, Default)]
pub struct InMemoryCollaborator {
    state: Mutex<State>,
}

impl InMemoryCollaborator {
    /// Create a new empty collaborator
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call of the named operation fail
    pub fn fail_on(&self, op: impl Into<String>) {
        self.state.lock().armed_failures.insert(op.into());
    }

    /// All accepted calls, in order
    pub fn journal(&self) -> Vec<Command> {
        self.state.lock().journal.clone()
    }

    /// Operation names of all accepted calls, in order
    pub fn op_names(&self) -> Vec<&'static str> {
        self.state.lock().journal.iter().map(|c| c.op_name()).collect()
    }

    /// Number of completed commits
    pub fn execution_count(&self) -> usize {
        self.state.lock().executions
    }

    /// Whether a committed feature with this name exists
    pub fn has_feature(&self, name: &str) -> bool {
        self.state.lock().committed.contains_key(name)
    }

    /// Committed elements of a sketch
    pub fn sketch_elements(&self, name: &str) -> Option<Vec<ElementRecord>> {
        self.state
            .lock()
            .committed
            .get(name)
            .map(|f| f.elements.clone())
    }

    /// Whether commands are buffered but not yet committed
    pub fn has_pending(&self) -> bool {
        let state = self.state.lock();
        state.buffered > 0 || state.open_sketch.is_some()
    }
}

impl CadCollaborator for InMemoryCollaborator {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_sketch(&self, name: &str, datum: DatumRef) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateSketch {
            name: name.to_string(),
            datum,
        };
        state.accept(&command)?;
        if let Some(open) = &state.open_sketch {
            return Err(CollaboratorError::OutOfSequence(format!(
                "sketch {} is still open",
                open.name
            )));
        }
        if state.committed.contains_key(name) {
            return Err(CollaboratorError::CommandRejected(format!(
                "feature {} already exists",
                name
            )));
        }
        state.open_sketch = Some(SketchDraft {
            name: name.to_string(),
            elements: Vec::new(),
        });
        state.record(command);
        Ok(())
    }

    fn create_circle(&self, center: DVec2, radius_point: DVec2) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateCircle {
            center,
            radius_point,
        };
        state.accept(&command)?;
        state.add_element(
            command.op_name(),
            ElementKind::Other(CIRCLE_TYPE_CODE),
            radius_point,
            radius_point,
        )?;
        state.record(command);
        Ok(())
    }

    fn create_interpolated_curve(&self, points: &[DVec2]) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateInterpolatedCurve {
            points: points.to_vec(),
        };
        state.accept(&command)?;
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(CollaboratorError::CommandRejected(
                "interpolated curve needs at least one point".into(),
            ));
        };
        state.add_element(
            command.op_name(),
            ElementKind::InterpolatedCurve,
            *first,
            *last,
        )?;
        state.record(command);
        Ok(())
    }

    fn create_line(&self, start: DVec2, end: DVec2) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateLine { start, end };
        state.accept(&command)?;
        state.add_element(command.op_name(), ElementKind::Segment, start, end)?;
        state.record(command);
        Ok(())
    }

    fn create_arc(&self, center: DVec2, start: DVec2, end: DVec2) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateArc { center, start, end };
        state.accept(&command)?;
        state.add_element(command.op_name(), ElementKind::Arc, start, end)?;
        state.record(command);
        Ok(())
    }

    fn exit_sketch(&self) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::ExitSketch;
        state.accept(&command)?;
        let draft = state
            .open_sketch
            .take()
            .ok_or_else(|| CollaboratorError::OutOfSequence("no open sketch to exit".into()))?;
        state.staged.push(Staged::Sketch(draft));
        state.record(command);
        Ok(())
    }

    fn edit_sketch(&self, name: &str) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::EditSketch {
            name: name.to_string(),
        };
        state.accept(&command)?;
        if state.open_sketch.is_some() {
            return Err(CollaboratorError::OutOfSequence(
                "another sketch is still open".into(),
            ));
        }
        let elements = state.lookup(name)?.elements.clone();
        state.open_sketch = Some(SketchDraft {
            name: name.to_string(),
            elements,
        });
        state.record(command);
        Ok(())
    }

    fn create_fillet_curve(
        &self,
        curve_a: ElementId,
        curve_b: ElementId,
        radius: f64,
        mode_a: TangencyMode,
        mode_b: TangencyMode,
    ) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CreateFilletCurve {
            curve_a,
            curve_b,
            radius,
            mode_a,
            mode_b,
        };
        state.accept(&command)?;
        if curve_a == curve_b {
            return Err(CollaboratorError::CommandRejected(
                "cannot fillet a curve with itself".into(),
            ));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CollaboratorError::CommandRejected(format!(
                "invalid fillet radius {}",
                radius
            )));
        }
        let draft = state.draft_mut(command.op_name())?;
        for id in [curve_a, curve_b] {
            if !draft.elements.iter().any(|e| e.id == id) {
                return Err(CollaboratorError::NotFound(format!(
                    "{} in sketch {}",
                    id, draft.name
                )));
            }
        }
        // The blend arc itself; its end points are not tracked here
        draft.elements.push(ElementRecord {
            id: ElementId(Uuid::new_v4()),
            type_code: ElementKind::ARC_CODE,
            start_point: None,
            end_point: None,
        });
        state.record(command);
        Ok(())
    }

    fn query_elements_by_feature_name(&self, names: &[&str]) -> CollabResult<Vec<ElementRecord>> {
        let mut state = self.state.lock();
        state.check_armed("query_elements_by_feature_name")?;
        let mut elements = Vec::new();
        for name in names {
            elements.extend(state.lookup(name)?.elements.iter().cloned());
        }
        state.record(Command::QueryElements {
            names: names.iter().map(|n| n.to_string()).collect(),
        });
        Ok(elements)
    }

    fn query_entities_by_feature_name(&self, names: &[&str]) -> CollabResult<Vec<EntityId>> {
        let mut state = self.state.lock();
        state.check_armed("query_entities_by_feature_name")?;
        let entities = names
            .iter()
            .map(|name| state.lookup(name).map(|f| f.entity))
            .collect::<CollabResult<Vec<_>>>()?;
        state.record(Command::QueryEntities {
            names: names.iter().map(|n| n.to_string()).collect(),
        });
        Ok(entities)
    }

    fn query_features_by_name(&self, names: &[&str]) -> CollabResult<Vec<FeatureId>> {
        let mut state = self.state.lock();
        state.check_armed("query_features_by_name")?;
        let features = names
            .iter()
            .map(|name| state.lookup(name).map(|f| f.feature))
            .collect::<CollabResult<Vec<_>>>()?;
        state.record(Command::QueryFeatures {
            names: names.iter().map(|n| n.to_string()).collect(),
        });
        Ok(features)
    }

    fn extrude(&self, sketch: EntityId, height: f64, output_name: &str) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::Extrude {
            sketch,
            height,
            output_name: output_name.to_string(),
        };
        state.accept(&command)?;
        if !state.entity_exists(sketch) {
            return Err(CollaboratorError::NotFound(sketch.to_string()));
        }
        state.staged.push(Staged::Feature(output_name.to_string()));
        state.record(command);
        Ok(())
    }

    fn extrude_cut(
        &self,
        sketch: EntityId,
        height: f64,
        target: EntityId,
        output_name: &str,
    ) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::ExtrudeCut {
            sketch,
            height,
            target,
            output_name: output_name.to_string(),
        };
        state.accept(&command)?;
        for entity in [sketch, target] {
            if !state.entity_exists(entity) {
                return Err(CollaboratorError::NotFound(entity.to_string()));
            }
        }
        state.staged.push(Staged::Feature(output_name.to_string()));
        state.record(command);
        Ok(())
    }

    fn circular_pattern(
        &self,
        feature: FeatureId,
        axis: PatternAxis,
        total_angle_degrees: f64,
        instance_count: u32,
        output_name: &str,
    ) -> CollabResult<()> {
        let mut state = self.state.lock();
        let command = Command::CircularPattern {
            feature,
            axis,
            total_angle_degrees,
            instance_count,
            output_name: output_name.to_string(),
        };
        state.accept(&command)?;
        if !state.feature_exists(feature) {
            return Err(CollaboratorError::NotFound(feature.to_string()));
        }
        if axis.direction().is_none() {
            return Err(CollaboratorError::CommandRejected(
                "pattern axis points coincide".into(),
            ));
        }
        state.staged.push(Staged::Feature(output_name.to_string()));
        state.record(command);
        Ok(())
    }

    fn execute(&self, commit_and_hold: bool) -> CollabResult<()> {
        let mut state = self.state.lock();
        state.check_armed("execute")?;
        if state.awaiting_clear {
            return Err(CollaboratorError::OutOfSequence(
                "execute issued before the previous commit was cleared".into(),
            ));
        }
        if let Some(open) = &state.open_sketch {
            return Err(CollaboratorError::OutOfSequence(format!(
                "sketch {} is still open",
                open.name
            )));
        }

        for staged in std::mem::take(&mut state.staged) {
            match staged {
                Staged::Sketch(draft) => {
                    // Re-committing an edited sketch keeps its identity
                    let (entity, feature) = match state.committed.get(&draft.name) {
                        Some(existing) => (existing.entity, existing.feature),
                        None => (EntityId(Uuid::new_v4()), FeatureId(Uuid::new_v4())),
                    };
                    state.committed.insert(
                        draft.name,
                        NamedFeature {
                            entity,
                            feature,
                            elements: draft.elements,
                        },
                    );
                }
                Staged::Feature(name) => {
                    state.committed.insert(
                        name,
                        NamedFeature {
                            entity: EntityId(Uuid::new_v4()),
                            feature: FeatureId(Uuid::new_v4()),
                            elements: Vec::new(),
                        },
                    );
                }
            }
        }

        state.buffered = 0;
        state.awaiting_clear = true;
        state.executions += 1;
        state.record(Command::Execute { commit_and_hold });
        Ok(())
    }

    fn clear_command(&self) -> CollabResult<()> {
        let mut state = self.state.lock();
        state.check_armed("clear_command")?;
        state.staged.clear();
        state.buffered = 0;
        state.awaiting_clear = false;
        state.record(Command::ClearCommand);
        Ok(())
    }
}
