//! Parametric Spur Gear Synthesis
//!
//! This crate provides:
//! - Gear parameters with derived circle radii
//! - Involute tooth-gap profile synthesis with bisection intersection search
//! - Fillet topology selection against collaborator sketch elements
//! - A staged build orchestrator driving an external CAD command interface
//! - An in-memory collaborator for dry runs and tests

pub mod build;
pub mod collaborator;
pub mod config;
pub mod constants;
pub mod error;
pub mod feature;
pub mod params;
pub mod profile;

// Re-exports for convenience
pub use build::{BuildReport, BuildStage, CommitMode, GearBuildOrchestrator, StageRecord};
pub use collaborator::{
    CadCollaborator, CollabResult, CollaboratorError, Command, DatumRef, ElementId, ElementKind,
    ElementRecord, EntityId, FeatureId, InMemoryCollaborator, NullCollaborator, PatternAxis,
    TangencyMode,
};
pub use config::{ConfigError, FeatureNames, GearConfig};
pub use error::{BuildError, GearError, GearResult};
pub use feature::{SketchCurve, SolidFeature};
pub use params::{GearInputs, GearParameters};
pub use profile::{
    FilletPlan, FilletTopology, IntersectionSolver, ProfileSynthesizer, RootKind, SketchElement,
    SynthesisSettings, ToothProfile,
};
