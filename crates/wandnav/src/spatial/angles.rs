//! Degree/radian conversion
//!
//! The host reports every angle in degrees; all quaternion math is in radians.

use std::f64::consts::PI;

pub fn degs_to_rads(degs: f64) -> f64 {
    degs / 180.0 * PI
}

pub fn rads_to_degs(rads: f64) -> f64 {
    rads / PI * 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert!((degs_to_rads(180.0) - PI).abs() < 1e-12);
        assert!((rads_to_degs(PI / 2.0) - 90.0).abs() < 1e-12);
        assert!((rads_to_degs(degs_to_rads(-37.5)) + 37.5).abs() < 1e-12);
    }
}
