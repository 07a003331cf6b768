//! Gear Build Orchestration
//!
//! Drives the collaborator through the fixed sequence of stages that turns a
//! synthesized tooth profile into a patterned gear body. Stages run strictly
//! in order; each commit is submitted and cleared before the next stage issues
//! commands. Later stages find earlier results by feature name. Any failure
//! abandons the build; features already committed are left to the collaborator.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaborator::{
    CadCollaborator, CollaboratorError, DatumRef, EntityId, FeatureId, PatternAxis, TangencyMode,
};
use crate::config::{FeatureNames, GearConfig};
use crate::constants::PATTERN_TOTAL_ANGLE_DEGREES;
use crate::error::{BuildError, GearResult};
use crate::feature::SolidFeature;
use crate::params::GearParameters;
use crate::profile::{FilletPlan, FilletTopology, ProfileSynthesizer, RootKind, ToothProfile};

/// A stage of a gear build, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStage {
    /// Profile synthesis, before any collaborator call
    Synthesis,
    /// Sketch with the addendum circle
    AddendumSketch,
    /// Sketch with the tooth-gap outline
    CutSketch,
    /// Element lookup and fillet pair selection
    FilletQuery,
    /// Root fillets in the cut sketch
    FilletApply,
    /// Blank body from the addendum sketch
    AddendumExtrude,
    /// Tooth gap cut from the blank
    CutExtrude,
    /// Cut repeated around the gear axis
    CircularPattern,
    Done,
}

impl BuildStage {
    /// The stage that follows this one
    pub fn next(&self) -> Option<BuildStage> {
        match self {
            BuildStage::Synthesis => Some(BuildStage::AddendumSketch),
            BuildStage::AddendumSketch => Some(BuildStage::CutSketch),
            BuildStage::CutSketch => Some(BuildStage::FilletQuery),
            BuildStage::FilletQuery => Some(BuildStage::FilletApply),
            BuildStage::FilletApply => Some(BuildStage::AddendumExtrude),
            BuildStage::AddendumExtrude => Some(BuildStage::CutExtrude),
            BuildStage::CutExtrude => Some(BuildStage::CircularPattern),
            BuildStage::CircularPattern => Some(BuildStage::Done),
            BuildStage::Done => None,
        }
    }

    /// Commit issued when this stage completes, if any
    pub fn commit_after(&self) -> Option<CommitMode> {
        match self {
            BuildStage::CutSketch => Some(CommitMode::Hold),
            BuildStage::FilletApply
            | BuildStage::AddendumExtrude
            | BuildStage::CutExtrude
            | BuildStage::CircularPattern => Some(CommitMode::Release),
            _ => None,
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How the collaborator keeps state after a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitMode {
    /// Commit and keep the committed sketches in hold
    Hold,
    /// Plain commit
    Release,
}

impl CommitMode {
    /// Value of the `commit_and_hold` flag
    pub fn holds(&self) -> bool {
        matches!(self, CommitMode::Hold)
    }
}

/// A completed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: BuildStage,
    /// Commit issued after the stage, if any
    pub commit: Option<CommitMode>,
}

/// Summary of a successful gear build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    /// Build identifier, also used in log lines
    pub id: Uuid,
    pub parameters: GearParameters,
    pub root_kind: RootKind,
    pub fillet_topology: FilletTopology,
    pub delta: f64,
    /// Number of points on each flank
    pub flank_points: usize,
    /// Name of the final patterned feature
    pub pattern_feature: String,
    pub stages: Vec<StageRecord>,
}

impl BuildReport {
    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Bookkeeping for one running build
struct BuildRun<'a> {
    id: Uuid,
    collaborator: &'a dyn CadCollaborator,
    parameters: GearParameters,
    stages: Vec<StageRecord>,
}

impl<'a> BuildRun<'a> {
    fn new(collaborator: &'a dyn CadCollaborator, parameters: GearParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            collaborator,
            parameters,
            stages: Vec::new(),
        }
    }

    /// Run one stage and its trailing commit; failures are wrapped with the stage
    fn stage<T>(
        &mut self,
        stage: BuildStage,
        body: impl FnOnce() -> GearResult<T>,
    ) -> Result<T, BuildError> {
        tracing::info!("Gear build {}: stage {}", self.id, stage);

        let commit = stage.commit_after();
        let result = body().and_then(|value| {
            if let Some(mode) = commit {
                self.commit(mode)?;
            }
            Ok(value)
        });

        match result {
            Ok(value) => {
                self.stages.push(StageRecord { stage, commit });
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Gear build {} abandoned at stage {}: {}", self.id, stage, e);
                Err(BuildError::new(stage, self.parameters, e))
            }
        }
    }

    /// Submit the buffered commands, then empty the buffer
    fn commit(&self, mode: CommitMode) -> GearResult<()> {
        self.collaborator.execute(mode.holds())?;
        self.collaborator.clear_command()?;
        tracing::info!("Gear build {}: committed ({:?})", self.id, mode);
        Ok(())
    }
}

/// Sequences a gear build against a CAD collaborator
pub struct GearBuildOrchestrator<'a> {
    collaborator: &'a dyn CadCollaborator,
    synthesizer: ProfileSynthesizer,
    names: FeatureNames,
    datum: DatumRef,
    pattern_axis: PatternAxis,
}

impl<'a> GearBuildOrchestrator<'a> {
    /// Create an orchestrator with default names, datum and axis
    pub fn new(collaborator: &'a dyn CadCollaborator) -> Self {
        Self::from_config(collaborator, &GearConfig::default())
    }

    /// Create an orchestrator using the settings of a configuration
    pub fn from_config(collaborator: &'a dyn CadCollaborator, config: &GearConfig) -> Self {
        Self {
            collaborator,
            synthesizer: ProfileSynthesizer::with_settings(config.synthesis),
            names: config.naming.clone(),
            datum: config.datum,
            pattern_axis: config.pattern_axis(),
        }
    }

    /// Feature names this orchestrator creates and looks up
    pub fn names(&self) -> &FeatureNames {
        &self.names
    }

    /// Build one gear body
    pub fn build(&self, params: &GearParameters) -> Result<BuildReport, BuildError> {
        let mut run = BuildRun::new(self.collaborator, *params);
        tracing::info!(
            "Gear build {} on {}: z={} m={} b={}",
            run.id,
            self.collaborator.name(),
            params.teeth(),
            params.module(),
            params.tooth_width()
        );

        let profile = run.stage(BuildStage::Synthesis, || {
            self.synthesizer.build_cut_profile(params)
        })?;
        run.stage(BuildStage::AddendumSketch, || self.addendum_sketch(params))?;
        run.stage(BuildStage::CutSketch, || self.cut_sketch(&profile))?;
        let plan = run.stage(BuildStage::FilletQuery, || self.fillet_query(&profile))?;
        run.stage(BuildStage::FilletApply, || self.fillet_apply(&plan))?;
        run.stage(BuildStage::AddendumExtrude, || self.addendum_extrude(params))?;
        run.stage(BuildStage::CutExtrude, || self.cut_extrude(params))?;
        run.stage(BuildStage::CircularPattern, || self.circular_pattern(params))?;

        tracing::info!(
            "Gear build {} complete after {} stages",
            run.id,
            run.stages.len()
        );

        Ok(BuildReport {
            id: run.id,
            parameters: *params,
            root_kind: profile.root_kind,
            fillet_topology: profile.fillet_topology,
            delta: profile.delta,
            flank_points: profile.right_flank.len(),
            pattern_feature: self.names.pattern.clone(),
            stages: run.stages,
        })
    }

    // ============== Stages ==============

    fn addendum_sketch(&self, params: &GearParameters) -> GearResult<()> {
        let collab = self.collaborator;
        collab.create_sketch(&self.names.addendum_sketch, self.datum)?;
        collab.create_circle(DVec2::ZERO, DVec2::new(params.addendum_radius(), 0.0))?;
        collab.exit_sketch()?;
        Ok(())
    }

    fn cut_sketch(&self, profile: &ToothProfile) -> GearResult<()> {
        let collab = self.collaborator;
        collab.create_sketch(&self.names.cut_sketch, self.datum)?;
        for curve in profile.sketch_curves() {
            tracing::debug!("Cut sketch: {}", curve.type_name());
            curve.submit(collab)?;
        }
        collab.exit_sketch()?;
        Ok(())
    }

    fn fillet_query(&self, profile: &ToothProfile) -> GearResult<FilletPlan> {
        let records = self
            .collaborator
            .query_elements_by_feature_name(&[self.names.cut_sketch.as_str()])?;
        FilletPlan::select(profile.fillet_topology, profile.fillet_radius, &records)
    }

    fn fillet_apply(&self, plan: &FilletPlan) -> GearResult<()> {
        let collab = self.collaborator;
        collab.edit_sketch(&self.names.cut_sketch)?;
        for (arc, curve) in plan.pairs() {
            collab.create_fillet_curve(
                arc,
                curve,
                plan.radius,
                TangencyMode::TRIM,
                TangencyMode::TRIM,
            )?;
        }
        collab.exit_sketch()?;
        Ok(())
    }

    fn addendum_extrude(&self, params: &GearParameters) -> GearResult<()> {
        let sketch = self.first_entity(&self.names.addendum_sketch)?;
        SolidFeature::Extrude {
            name: self.names.boss_extrude.clone(),
            sketch,
            height: params.tooth_width(),
        }
        .submit(self.collaborator)?;
        Ok(())
    }

    fn cut_extrude(&self, params: &GearParameters) -> GearResult<()> {
        let sketch = self.first_entity(&self.names.cut_sketch)?;
        let target = self.first_entity(&self.names.boss_extrude)?;
        SolidFeature::ExtrudeCut {
            name: self.names.cut_extrude.clone(),
            sketch,
            height: params.tooth_width(),
            target,
        }
        .submit(self.collaborator)?;
        Ok(())
    }

    fn circular_pattern(&self, params: &GearParameters) -> GearResult<()> {
        let feature = self.first_feature(&self.names.cut_extrude)?;
        SolidFeature::CircularPattern {
            name: self.names.pattern.clone(),
            feature,
            axis: self.pattern_axis,
            total_angle_degrees: PATTERN_TOTAL_ANGLE_DEGREES,
            instances: params.teeth(),
        }
        .submit(self.collaborator)?;
        Ok(())
    }

    // ============== Name Lookups ==============

    /// First entity created by the named feature
    fn first_entity(&self, name: &str) -> GearResult<EntityId> {
        let entities = self.collaborator.query_entities_by_feature_name(&[name])?;
        if entities.len() > 1 {
            tracing::debug!("{} entities for {}, using the first", entities.len(), name);
        }
        entities.first().copied().ok_or_else(|| {
            CollaboratorError::NotFound(format!("no entity for feature {}", name)).into()
        })
    }

    /// First feature with the given name
    fn first_feature(&self, name: &str) -> GearResult<FeatureId> {
        let features = self.collaborator.query_features_by_name(&[name])?;
        features
            .first()
            .copied()
            .ok_or_else(|| CollaboratorError::NotFound(format!("feature {}", name)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{
        CollabResult, Command, ElementId, ElementKind, ElementRecord, InMemoryCollaborator,
        NullCollaborator,
    };
    use crate::error::GearError;
    use crate::params::GearInputs;

    /// How a [`QuirkyHost`] bends the in-memory responses
    #[derive(Clone, Copy, PartialEq)]
    enum Quirk {
        /// Entity queries return an extra entity after the real one
        ExtraEntities,
        /// Entity queries return nothing
        NoEntities,
        /// Element queries leave out every arc
        NoArcs,
    }

    /// In-memory host whose query responses are altered
    struct QuirkyHost {
        inner: InMemoryCollaborator,
        quirk: Quirk,
    }

    impl QuirkyHost {
        fn new(quirk: Quirk) -> Self {
            Self {
                inner: InMemoryCollaborator::new(),
                quirk,
            }
        }
    }

    impl CadCollaborator for QuirkyHost {
        fn name(&self) -> &str {
            "quirky"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn create_sketch(&self, name: &str, datum: DatumRef) -> CollabResult<()> {
            self.inner.create_sketch(name, datum)
        }

        fn create_circle(&self, center: DVec2, radius_point: DVec2) -> CollabResult<()> {
            self.inner.create_circle(center, radius_point)
        }

        fn create_interpolated_curve(&self, points: &[DVec2]) -> CollabResult<()> {
            self.inner.create_interpolated_curve(points)
        }

        fn create_line(&self, start: DVec2, end: DVec2) -> CollabResult<()> {
            self.inner.create_line(start, end)
        }

        fn create_arc(&self, center: DVec2, start: DVec2, end: DVec2) -> CollabResult<()> {
            self.inner.create_arc(center, start, end)
        }

        fn exit_sketch(&self) -> CollabResult<()> {
            self.inner.exit_sketch()
        }

        fn edit_sketch(&self, name: &str) -> CollabResult<()> {
            self.inner.edit_sketch(name)
        }

        fn create_fillet_curve(
            &self,
            curve_a: ElementId,
            curve_b: ElementId,
            radius: f64,
            mode_a: TangencyMode,
            mode_b: TangencyMode,
        ) -> CollabResult<()> {
            self.inner
                .create_fillet_curve(curve_a, curve_b, radius, mode_a, mode_b)
        }

        fn query_elements_by_feature_name(
            &self,
            names: &[&str],
        ) -> CollabResult<Vec<ElementRecord>> {
            let mut elements = self.inner.query_elements_by_feature_name(names)?;
            if self.quirk == Quirk::NoArcs {
                elements.retain(|e| e.kind() != ElementKind::Arc);
            }
            Ok(elements)
        }

        fn query_entities_by_feature_name(&self, names: &[&str]) -> CollabResult<Vec<EntityId>> {
            let mut entities = self.inner.query_entities_by_feature_name(names)?;
            match self.quirk {
                Quirk::ExtraEntities => entities.push(EntityId(Uuid::new_v4())),
                Quirk::NoEntities => entities.clear(),
                Quirk::NoArcs => {}
            }
            Ok(entities)
        }

        fn query_features_by_name(&self, names: &[&str]) -> CollabResult<Vec<FeatureId>> {
            self.inner.query_features_by_name(names)
        }

        fn extrude(&self, sketch: EntityId, height: f64, output_name: &str) -> CollabResult<()> {
            self.inner.extrude(sketch, height, output_name)
        }

        fn extrude_cut(
            &self,
            sketch: EntityId,
            height: f64,
            target: EntityId,
            output_name: &str,
        ) -> CollabResult<()> {
            self.inner.extrude_cut(sketch, height, target, output_name)
        }

        fn circular_pattern(
            &self,
            feature: FeatureId,
            axis: PatternAxis,
            total_angle_degrees: f64,
            instance_count: u32,
            output_name: &str,
        ) -> CollabResult<()> {
            self.inner
                .circular_pattern(feature, axis, total_angle_degrees, instance_count, output_name)
        }

        fn execute(&self, commit_and_hold: bool) -> CollabResult<()> {
            self.inner.execute(commit_and_hold)
        }

        fn clear_command(&self) -> CollabResult<()> {
            self.inner.clear_command()
        }
    }

    fn params(teeth: u32, module: f64) -> GearParameters {
        GearParameters::new(GearInputs::standard(teeth, module)).unwrap()
    }

    #[test]
    fn test_stage_sequence() {
        let mut stage = BuildStage::Synthesis;
        let mut order = vec![stage];
        while let Some(next) = stage.next() {
            order.push(next);
            stage = next;
        }
        assert_eq!(order.len(), 9);
        assert_eq!(order.last(), Some(&BuildStage::Done));
        assert_eq!(BuildStage::CutSketch.commit_after(), Some(CommitMode::Hold));
        assert_eq!(BuildStage::AddendumSketch.commit_after(), None);
        assert_eq!(BuildStage::FilletQuery.to_string(), "FilletQuery");
    }

    #[test]
    fn test_reference_build_call_order() {
        let collab = InMemoryCollaborator::new();
        let report = GearBuildOrchestrator::new(&collab)
            .build(&params(20, 2.0))
            .unwrap();

        assert_eq!(
            collab.op_names(),
            vec![
                "create_sketch",
                "create_circle",
                "exit_sketch",
                "create_sketch",
                "create_interpolated_curve",
                "create_interpolated_curve",
                "create_line",
                "create_arc",
                "create_line",
                "create_line",
                "exit_sketch",
                "execute",
                "clear_command",
                "query_elements_by_feature_name",
                "edit_sketch",
                "create_fillet_curve",
                "create_fillet_curve",
                "exit_sketch",
                "execute",
                "clear_command",
                "query_entities_by_feature_name",
                "extrude",
                "execute",
                "clear_command",
                "query_entities_by_feature_name",
                "query_entities_by_feature_name",
                "extrude_cut",
                "execute",
                "clear_command",
                "query_features_by_name",
                "circular_pattern",
                "execute",
                "clear_command",
            ]
        );
        assert_eq!(report.fillet_topology, FilletTopology::ConnectorSegments);
        assert_eq!(report.stages.len(), 8);
        assert_eq!(collab.execution_count(), 5);
        assert!(!collab.has_pending());
        assert!(collab.has_feature("CircularPattern1"));
    }

    #[test]
    fn test_commit_modes() {
        let collab = InMemoryCollaborator::new();
        GearBuildOrchestrator::new(&collab)
            .build(&params(20, 2.0))
            .unwrap();

        let holds: Vec<bool> = collab
            .journal()
            .into_iter()
            .filter_map(|c| match c {
                Command::Execute { commit_and_hold } => Some(commit_and_hold),
                _ => None,
            })
            .collect();
        assert_eq!(holds, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_addendum_circle_and_pattern_arguments() {
        let collab = InMemoryCollaborator::new();
        GearBuildOrchestrator::new(&collab)
            .build(&params(20, 2.0))
            .unwrap();
        let journal = collab.journal();

        assert!(journal.contains(&Command::CreateCircle {
            center: DVec2::ZERO,
            radius_point: DVec2::new(22.0, 0.0),
        }));
        assert!(journal.iter().any(|c| matches!(
            c,
            Command::CircularPattern {
                instance_count: 20,
                total_angle_degrees,
                axis,
                ..
            } if *total_angle_degrees == 360.0 && *axis == PatternAxis::z(10.0)
        )));
        assert!(journal.iter().any(|c| matches!(
            c,
            Command::Extrude { height, output_name, .. }
                if *height == 20.0 && output_name == "Boss-Extrude1"
        )));
    }

    #[test]
    fn test_connector_fillets_target_segments() {
        let collab = InMemoryCollaborator::new();
        GearBuildOrchestrator::new(&collab)
            .build(&params(20, 2.0))
            .unwrap();

        let elements = collab.sketch_elements("Sketch2").unwrap();
        let kind_of = |id| {
            elements
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.kind())
                .unwrap()
        };
        for command in collab.journal() {
            if let Command::CreateFilletCurve {
                curve_a,
                curve_b,
                radius,
                mode_a,
                mode_b,
            } = command
            {
                assert_eq!(kind_of(curve_a), ElementKind::Arc);
                assert_eq!(kind_of(curve_b), ElementKind::Segment);
                assert!((radius - 0.76).abs() < 1e-12);
                assert_eq!(mode_a, TangencyMode::TRIM);
                assert_eq!(mode_b, TangencyMode::TRIM);
            }
        }
    }

    #[test]
    fn test_flank_fillets_target_curves() {
        let collab = InMemoryCollaborator::new();
        let report = GearBuildOrchestrator::new(&collab)
            .build(&params(40, 1.0))
            .unwrap();
        assert_eq!(report.fillet_topology, FilletTopology::FlankCurves);

        let elements = collab.sketch_elements("Sketch2").unwrap();
        let fillet_targets: Vec<ElementKind> = collab
            .journal()
            .into_iter()
            .filter_map(|c| match c {
                Command::CreateFilletCurve { curve_b, .. } => {
                    elements.iter().find(|e| e.id == curve_b).map(|e| e.kind())
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            fillet_targets,
            vec![ElementKind::InterpolatedCurve, ElementKind::InterpolatedCurve]
        );
    }

    #[test]
    fn test_pointed_root_build() {
        let collab = InMemoryCollaborator::new();
        let report = GearBuildOrchestrator::new(&collab)
            .build(&params(50, 1.0))
            .unwrap();
        assert_eq!(report.root_kind, RootKind::PointedRoot);
        assert_eq!(report.fillet_topology, FilletTopology::FlankCurves);
        assert!(report.to_json().unwrap().contains("PointedRoot"));
    }

    #[test]
    fn test_failure_abandons_build() {
        let collab = InMemoryCollaborator::new();
        collab.fail_on("extrude");

        let err = GearBuildOrchestrator::new(&collab)
            .build(&params(20, 2.0))
            .unwrap_err();
        assert_eq!(err.stage, BuildStage::AddendumExtrude);
        assert!(matches!(
            err.source,
            GearError::Collaborator(CollaboratorError::CommandRejected(_))
        ));

        // Nothing is issued after the failing call and nothing is rolled back
        assert_eq!(
            collab.op_names().last(),
            Some(&"query_entities_by_feature_name")
        );
        assert!(collab.has_feature("Sketch2"));
        assert!(!collab.has_feature("Boss-Extrude1"));
    }

    #[test]
    fn test_unavailable_collaborator() {
        let err = GearBuildOrchestrator::new(&NullCollaborator)
            .build(&params(20, 2.0))
            .unwrap_err();
        assert_eq!(err.stage, BuildStage::AddendumSketch);
        assert!(!err.is_pre_collaborator());
        assert!(matches!(
            err.source,
            GearError::Collaborator(CollaboratorError::Unavailable(_))
        ));
    }

    #[test]
    fn test_synthesis_failure_makes_no_calls() {
        let collab = InMemoryCollaborator::new();
        let bad = GearParameters::new(GearInputs::standard(20, 2.0).with_profile_shift(-1.2))
            .unwrap();

        let err = GearBuildOrchestrator::new(&collab).build(&bad).unwrap_err();
        assert_eq!(err.stage, BuildStage::Synthesis);
        assert!(err.is_pre_collaborator());
        assert_eq!(err.parameters, bad);
        assert!(collab.journal().is_empty());
    }

    #[test]
    fn test_custom_feature_names() {
        let collab = InMemoryCollaborator::new();
        let mut config = GearConfig::default();
        config.naming.cut_sketch = "ToothGap".into();
        config.naming.pattern = "Teeth".into();

        let report = GearBuildOrchestrator::from_config(&collab, &config)
            .build(&params(20, 2.0))
            .unwrap();
        assert_eq!(report.pattern_feature, "Teeth");
        assert!(collab.has_feature("ToothGap"));
        assert!(collab.has_feature("Teeth"));
    }

    #[test]
    fn test_extra_entities_use_the_first() {
        let host = QuirkyHost::new(Quirk::ExtraEntities);
        let report = GearBuildOrchestrator::new(&host)
            .build(&params(20, 2.0))
            .unwrap();
        assert_eq!(report.stages.len(), 8);

        let addendum = host.inner.query_entities_by_feature_name(&["Sketch1"]).unwrap()[0];
        let cut = host.inner.query_entities_by_feature_name(&["Sketch2"]).unwrap()[0];
        let boss = host
            .inner
            .query_entities_by_feature_name(&["Boss-Extrude1"])
            .unwrap()[0];
        let journal = host.inner.journal();
        assert!(journal.iter().any(|c| matches!(
            c,
            Command::Extrude { sketch, .. } if *sketch == addendum
        )));
        assert!(journal.iter().any(|c| matches!(
            c,
            Command::ExtrudeCut { sketch, target, .. } if *sketch == cut && *target == boss
        )));
    }

    #[test]
    fn test_empty_entity_lookup_is_not_found() {
        let host = QuirkyHost::new(Quirk::NoEntities);
        let err = GearBuildOrchestrator::new(&host)
            .build(&params(20, 2.0))
            .unwrap_err();
        assert_eq!(err.stage, BuildStage::AddendumExtrude);
        assert!(matches!(
            err.source,
            GearError::Collaborator(CollaboratorError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_root_arc_fails_fillet_query() {
        let host = QuirkyHost::new(Quirk::NoArcs);
        let err = GearBuildOrchestrator::new(&host)
            .build(&params(20, 2.0))
            .unwrap_err();
        assert_eq!(err.stage, BuildStage::FilletQuery);
        assert!(matches!(err.source, GearError::ProfileTopology(_)));
        assert!(err.to_string().contains("FilletQuery"));

        // Nothing is issued once the selection fails
        assert_eq!(
            host.inner.op_names().last(),
            Some(&"query_elements_by_feature_name")
        );
    }
}
