//! Wrapper module to allow switching the float type globally.
//!
//! All of the functions from `f32`/`f64` are glob imported into this module, so that they can be
//! used elsewhere.

/// Type alias for the selected global float type
pub type Float = f64;

// import everything to do with the float
pub use std::f64::consts::*;
pub use std::f64::*;

/// Converts an angle in degrees to radians
pub fn deg_to_rad(deg: Float) -> Float {
    deg / 180.0 * PI
}

/// Converts an angle in radians to degrees
pub fn rad_to_deg(rad: Float) -> Float {
    rad * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_conversions() {
        assert_eq!(deg_to_rad(180.0), PI);
        assert_eq!(deg_to_rad(0.0), 0.0);
        assert!((rad_to_deg(FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((rad_to_deg(deg_to_rad(37.5)) - 37.5).abs() < 1e-12);
    }
}
