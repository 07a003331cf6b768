//! Gear configuration file serialization

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collaborator::{DatumRef, PatternAxis};
use crate::constants::PATTERN_AXIS_HEIGHT;
use crate::params::GearInputs;
use crate::profile::SynthesisSettings;

/// Names of the features a build creates and later looks up again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureNames {
    /// Sketch holding the addendum circle
    pub addendum_sketch: String,
    /// Sketch holding the tooth-gap outline
    pub cut_sketch: String,
    /// Blank body extruded from the addendum sketch
    pub boss_extrude: String,
    /// Single tooth gap cut from the blank
    pub cut_extrude: String,
    /// Pattern of the cut around the gear axis
    pub pattern: String,
}

impl Default for FeatureNames {
    fn default() -> Self {
        Self {
            addendum_sketch: "Sketch1".into(),
            cut_sketch: "Sketch2".into(),
            boss_extrude: "Boss-Extrude1".into(),
            cut_extrude: "Cut-Extrude1".into(),
            pattern: "CircularPattern1".into(),
        }
    }
}

/// Everything needed to run one gear build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearConfig {
    /// Primary gear inputs
    pub gear: GearInputs,
    /// Involute sweep and search settings
    pub synthesis: SynthesisSettings,
    /// Feature names used across stage boundaries
    pub naming: FeatureNames,
    /// Datum plane both sketches are placed on
    pub datum: DatumRef,
    /// Height of the second point of the pattern axis
    pub pattern_axis_height: f64,
}

impl Default for GearConfig {
    fn default() -> Self {
        Self {
            gear: GearInputs::default(),
            synthesis: SynthesisSettings::default(),
            naming: FeatureNames::default(),
            datum: DatumRef::default(),
            pattern_axis_height: PATTERN_AXIS_HEIGHT,
        }
    }
}

impl GearConfig {
    /// Create a configuration for the given inputs with default settings
    pub fn new(gear: GearInputs) -> Self {
        Self {
            gear,
            ..Default::default()
        }
    }

    /// Axis the tooth gap is patterned around
    pub fn pattern_axis(&self) -> PatternAxis {
        PatternAxis::z(self.pattern_axis_height)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize configuration to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: GearConfig =
            ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        let config: GearConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(config)
    }
}

/// Configuration file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
