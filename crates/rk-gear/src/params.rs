//! Spur gear design parameters
//!
//! The primary inputs of a spur gear and the circle radii derived from them.
//! Derivation happens once in [`GearParameters::new`]; the result is read-only.
//!
//! - dividing radius `rd = m * z / 2`
//! - base radius `rb = rd * cos(alpha)`
//! - addendum radius `ra = rd + m * (ha* + x)`
//! - dedendum radius `rf = rd - m * (ha* + c* - x)`

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FILLET_COEFFICIENT, STANDARD_ADDENDUM, STANDARD_CLEARANCE, STANDARD_PRESSURE_ANGLE,
    STUB_ADDENDUM, STUB_CLEARANCE,
};
use crate::error::{GearError, GearResult};

/// Primary, user-supplied gear inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearInputs {
    /// Tooth count z
    pub teeth: u32,
    /// Module m (length units)
    pub module: f64,
    /// Pressure angle alpha (radians)
    pub pressure_angle: f64,
    /// Tooth (face) width b
    pub tooth_width: f64,
    /// Root fillet coefficient; fillet radius = coefficient * m
    pub fillet_coefficient: f64,
    /// Addendum coefficient ha*
    pub addendum_coefficient: f64,
    /// Clearance coefficient c*
    pub clearance_coefficient: f64,
    /// Rotation angle beta (kept for helical variants, unused by spur geometry)
    pub rotation_angle: f64,
    /// Profile shift (modification) coefficient x, may be negative
    pub profile_shift: f64,
}

impl Default for GearInputs {
    fn default() -> Self {
        Self::standard(20, 2.0)
    }
}

impl GearInputs {
    /// Full-depth teeth (ha* = 1.0, c* = 0.25) at 20 degrees pressure angle.
    ///
    /// Face width defaults to ten modules.
    pub fn standard(teeth: u32, module: f64) -> Self {
        Self {
            teeth,
            module,
            pressure_angle: STANDARD_PRESSURE_ANGLE,
            tooth_width: 10.0 * module,
            fillet_coefficient: DEFAULT_FILLET_COEFFICIENT,
            addendum_coefficient: STANDARD_ADDENDUM,
            clearance_coefficient: STANDARD_CLEARANCE,
            rotation_angle: 0.0,
            profile_shift: 0.0,
        }
    }

    /// Stub teeth (ha* = 0.8, c* = 0.3) at 20 degrees pressure angle
    pub fn stub(teeth: u32, module: f64) -> Self {
        Self {
            addendum_coefficient: STUB_ADDENDUM,
            clearance_coefficient: STUB_CLEARANCE,
            ..Self::standard(teeth, module)
        }
    }

    /// Set the pressure angle in degrees
    pub fn with_pressure_angle_degrees(mut self, degrees: f64) -> Self {
        self.pressure_angle = degrees.to_radians();
        self
    }

    /// Set the face width
    pub fn with_tooth_width(mut self, width: f64) -> Self {
        self.tooth_width = width;
        self
    }

    /// Set the root fillet coefficient
    pub fn with_fillet_coefficient(mut self, coefficient: f64) -> Self {
        self.fillet_coefficient = coefficient;
        self
    }

    /// Set the profile shift coefficient
    pub fn with_profile_shift(mut self, shift: f64) -> Self {
        self.profile_shift = shift;
        self
    }
}

/// Validated gear parameters with derived radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GearParameters {
    inputs: GearInputs,
    dividing_radius: f64,
    base_radius: f64,
    addendum_radius: f64,
    dedendum_radius: f64,
}

impl GearParameters {
    /// Validate the inputs and derive every circle radius
    pub fn new(inputs: GearInputs) -> GearResult<Self> {
        if inputs.teeth < 1 {
            return Err(GearError::InvalidParameter(format!(
                "tooth count must be at least 1, got {}",
                inputs.teeth
            )));
        }
        if !inputs.module.is_finite() || inputs.module <= 0.0 {
            return Err(GearError::InvalidParameter(format!(
                "module must be positive, got {}",
                inputs.module
            )));
        }
        if !inputs.tooth_width.is_finite() || inputs.tooth_width <= 0.0 {
            return Err(GearError::InvalidParameter(format!(
                "tooth width must be positive, got {}",
                inputs.tooth_width
            )));
        }
        if !inputs.fillet_coefficient.is_finite() || inputs.fillet_coefficient <= 0.0 {
            return Err(GearError::InvalidParameter(format!(
                "fillet coefficient must be positive, got {}",
                inputs.fillet_coefficient
            )));
        }

        let m = inputs.module;
        let dividing_radius = m * inputs.teeth as f64 / 2.0;
        let base_radius = dividing_radius * inputs.pressure_angle.cos();
        let addendum_radius =
            dividing_radius + m * (inputs.addendum_coefficient + inputs.profile_shift);
        let dedendum_radius = dividing_radius
            - m * (inputs.addendum_coefficient + inputs.clearance_coefficient
                - inputs.profile_shift);

        for (label, radius) in [
            ("dividing", dividing_radius),
            ("base", base_radius),
            ("addendum", addendum_radius),
            ("dedendum", dedendum_radius),
        ] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(GearError::InvalidParameter(format!(
                    "{} radius must be positive and finite, got {}",
                    label, radius
                )));
            }
        }
        if addendum_radius <= dedendum_radius {
            return Err(GearError::InvalidParameter(format!(
                "addendum radius {} must exceed dedendum radius {}",
                addendum_radius, dedendum_radius
            )));
        }

        Ok(Self {
            inputs,
            dividing_radius,
            base_radius,
            addendum_radius,
            dedendum_radius,
        })
    }

    pub fn teeth(&self) -> u32 {
        self.inputs.teeth
    }

    pub fn module(&self) -> f64 {
        self.inputs.module
    }

    pub fn pressure_angle(&self) -> f64 {
        self.inputs.pressure_angle
    }

    pub fn tooth_width(&self) -> f64 {
        self.inputs.tooth_width
    }

    pub fn profile_shift(&self) -> f64 {
        self.inputs.profile_shift
    }

    pub fn rotation_angle(&self) -> f64 {
        self.inputs.rotation_angle
    }

    /// Dividing (pitch) circle radius
    pub fn dividing_radius(&self) -> f64 {
        self.dividing_radius
    }

    /// Base circle radius the involute unwinds from
    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Tip circle radius
    pub fn addendum_radius(&self) -> f64 {
        self.addendum_radius
    }

    /// Root circle radius
    pub fn dedendum_radius(&self) -> f64 {
        self.dedendum_radius
    }

    /// Root fillet radius (fillet coefficient times module)
    pub fn fillet_radius(&self) -> f64 {
        self.inputs.fillet_coefficient * self.inputs.module
    }

    /// Radius at which the flank is located for the tooth axis, shifted by the profile shift
    pub fn shifted_dividing_radius(&self) -> f64 {
        self.dividing_radius + self.inputs.profile_shift * self.inputs.module
    }

    /// Radial height of the tooth above the dividing circle
    pub fn addendum(&self) -> f64 {
        self.addendum_radius - self.dividing_radius
    }

    /// Radial depth of the tooth below the dividing circle
    pub fn dedendum(&self) -> f64 {
        self.dividing_radius - self.dedendum_radius
    }

    /// Total tooth depth
    pub fn whole_depth(&self) -> f64 {
        self.addendum_radius - self.dedendum_radius
    }

    pub fn dividing_diameter(&self) -> f64 {
        2.0 * self.dividing_radius
    }

    pub fn base_diameter(&self) -> f64 {
        2.0 * self.base_radius
    }

    pub fn addendum_diameter(&self) -> f64 {
        2.0 * self.addendum_radius
    }

    pub fn dedendum_diameter(&self) -> f64 {
        2.0 * self.dedendum_radius
    }

    /// Whether the base circle lies outside the root circle
    pub fn base_outside_root(&self) -> bool {
        self.base_radius > self.dedendum_radius
    }
}
