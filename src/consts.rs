//! Tolerances that depend on the active float precision.

use crate::float::*;

#[cfg(not(feature = "single_precision"))]
pub use self::double::*;
#[cfg(feature = "single_precision")]
pub use self::single::*;

pub const INFINITY: Float = Float::INFINITY;
#[allow(clippy::unnecessary_cast)]
pub const PI: Float = std::f64::consts::PI as Float;

#[cfg(not(feature = "single_precision"))]
mod double {
    use super::*;

    /// Minimum accepted travel along a ray
    pub const EPSILON: Float = 1e-6;
    /// Relative size of a cubic discriminant that still counts as a double root
    pub const ROOT_EPSILON: Float = 1e-14;
}

#[cfg(feature = "single_precision")]
mod single {
    use super::*;

    pub const EPSILON: Float = 1e-4;
    pub const ROOT_EPSILON: Float = 1e-6;
}
