//! Gear synthesis and build errors

use thiserror::Error;

use crate::build::BuildStage;
use crate::collaborator::CollaboratorError;
use crate::params::GearParameters;

/// Errors raised while deriving, synthesizing or building a gear
#[derive(Debug, Clone, Error)]
pub enum GearError {
    #[error("Invalid gear parameter: {0}")]
    InvalidParameter(String),

    #[error("Numeric search did not converge: {0}")]
    NumericConvergence(String),

    #[error("Unexpected profile topology: {0}")]
    ProfileTopology(String),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

/// Result type for gear operations
pub type GearResult<T> = Result<T, GearError>;

/// A fatal build failure with the stage and inputs it happened with
#[derive(Debug, Clone, Error)]
#[error("Gear build failed at stage {stage}: {source}")]
pub struct BuildError {
    /// Stage that was running when the build was abandoned
    pub stage: BuildStage,
    /// Snapshot of the parameters the build was started with
    pub parameters: GearParameters,
    /// Underlying cause
    #[source]
    pub source: GearError,
}

impl BuildError {
    /// Wrap a gear error with its build context
    pub fn new(stage: BuildStage, parameters: GearParameters, source: GearError) -> Self {
        Self {
            stage,
            parameters,
            source,
        }
    }

    /// Whether the failure happened before any collaborator call was made
    pub fn is_pre_collaborator(&self) -> bool {
        self.stage == BuildStage::Synthesis
    }
}
