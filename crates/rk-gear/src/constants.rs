//! Global constants for rk-gear

use std::f64::consts::PI;

/// Upper bound of the involute roll parameter swept for each flank (radians)
pub const INVOLUTE_SWEEP_ANGLE: f64 = PI / 3.0;

/// Increment of the involute roll parameter between flank samples (radians)
pub const INVOLUTE_SAMPLE_STEP: f64 = 0.05;

/// Radial residual at which the bisection search stops (length units)
pub const BISECTION_TOLERANCE: f64 = 1e-3;

/// Hard cap on bisection halvings
pub const BISECTION_MAX_ITERATIONS: usize = 40;

/// Coordinates closer to zero than this are emitted as exactly zero
pub const SNAP_EPSILON: f64 = 1e-10;

/// Standard pressure angle (20 degrees)
pub const STANDARD_PRESSURE_ANGLE: f64 = PI / 9.0;

/// Addendum coefficient for full-depth teeth
pub const STANDARD_ADDENDUM: f64 = 1.0;

/// Clearance coefficient for full-depth teeth
pub const STANDARD_CLEARANCE: f64 = 0.25;

/// Addendum coefficient for stub teeth
pub const STUB_ADDENDUM: f64 = 0.8;

/// Clearance coefficient for stub teeth
pub const STUB_CLEARANCE: f64 = 0.3;

/// Catalogue of root fillet coefficients (fillet radius = coefficient * module)
pub const FILLET_COEFFICIENTS: [f64; 4] = [0.25, 0.3, 0.38, 0.39];

/// Default root fillet coefficient
pub const DEFAULT_FILLET_COEFFICIENT: f64 = 0.38;

/// Sketch datum the gear sketches are placed on
pub const DEFAULT_DATUM: u32 = 8;

/// Z coordinate of the second point defining the circular pattern axis
pub const PATTERN_AXIS_HEIGHT: f64 = 10.0;

/// Total sweep of the circular pattern (degrees)
pub const PATTERN_TOTAL_ANGLE_DEGREES: f64 = 360.0;
