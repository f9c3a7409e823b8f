//! Quaternion representation for wand and camera orientation
//!
//! Axis convention: Z is up, Y is forward, X is right. Yaw turns about Z,
//! pitch about X, roll about Y, applied intrinsically in that order.

use std::f64::consts::FRAC_PI_2;
use std::ops::{Mul, MulAssign};

use super::Vector3;

/// Tolerance on `sin(pitch)` before the extraction treats the orientation as gimbal-locked
const GIMBAL_EPSILON: f64 = 1e-5;

/// Yaw, pitch and roll in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ypr {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Ypr {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }
}

/// An orientation quaternion `(x, y, z, w)`.
///
/// Not guaranteed to be unit length at all times; quaternions built with
/// [`Quaternion::from_ypr`] are unit by construction and
/// [`Quaternion::normalise`] restores the invariant after drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Create a new quaternion
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a quaternion from axis-angle representation
    pub fn from_axis_angle(axis: Vector3, angle_radians: f64) -> Self {
        let half_angle = angle_radians / 2.0;
        let sin_half = half_angle.sin();
        let normalized = axis.normalised();

        Self {
            x: normalized.x() * sin_half,
            y: normalized.y() * sin_half,
            z: normalized.z() * sin_half,
            w: half_angle.cos(),
        }
    }

    /// Build the rotation that applies yaw, then pitch, then roll (radians)
    pub fn from_ypr(yaw: f64, pitch: f64, roll: f64) -> Self {
        let cy = (yaw / 2.0).cos();
        let sy = (yaw / 2.0).sin();
        let cp = (pitch / 2.0).cos();
        let sp = (pitch / 2.0).sin();
        let cr = (roll / 2.0).cos();
        let sr = (roll / 2.0).sin();

        Self {
            x: cy * sp * cr - sy * cp * sr,
            y: cy * cp * sr + sy * sp * cr,
            z: cy * sp * sr + sy * cp * cr,
            w: cy * cp * cr - sy * sp * sr,
        }
    }

    /// Decompose into yaw, pitch and roll.
    ///
    /// Near ±90° pitch the general formula is singular; there the roll is
    /// forced to zero and the whole heading is reported as yaw.
    pub fn ypr(&self) -> Ypr {
        let Self { x, y, z, w } = *self;

        let sin_pitch = 2.0 * (z * y + w * x);
        if (sin_pitch - 1.0).abs() < GIMBAL_EPSILON {
            return Ypr::new(2.0 * y.atan2(w), FRAC_PI_2, 0.0);
        }
        if (sin_pitch + 1.0).abs() < GIMBAL_EPSILON {
            return Ypr::new(-2.0 * y.atan2(w), -FRAC_PI_2, 0.0);
        }

        Ypr::new(
            (2.0 * (w * z - x * y)).atan2(1.0 - 2.0 * (x * x + z * z)),
            sin_pitch.asin(),
            (2.0 * (w * y - x * z)).atan2(1.0 - 2.0 * (x * x + y * y)),
        )
    }

    pub fn roll(&self) -> f64 {
        let Self { x, y, z, w } = *self;
        (2.0 * (w * y - x * z)).atan2(1.0 - 2.0 * (x * x + y * y))
    }

    /// Pitch of the forward (Y) axis above the horizontal plane
    pub fn pitch(&self) -> f64 {
        let forward = self.y_axis(1.0);
        let pitch = forward.z().asin();
        if pitch.is_nan() {
            // forward.z drifted just past ±1
            return FRAC_PI_2 * forward.z().signum();
        }
        pitch
    }

    /// Heading of the right (X) axis; the right axis never collapses onto the vertical
    pub fn yaw(&self) -> f64 {
        let right = self.x_axis(1.0);
        right.y().atan2(right.x())
    }

    /// Local X axis scaled by `v`
    pub fn x_axis(&self, v: f64) -> Vector3 {
        let Self { x, y, z, w } = *self;
        Vector3::new(
            v * (w * w + x * x - y * y - z * z),
            v * (2.0 * (x * y + z * w)),
            v * (2.0 * (x * z - y * w)),
        )
    }

    /// Local Y (forward) axis scaled by `v`
    pub fn y_axis(&self, v: f64) -> Vector3 {
        let Self { x, y, z, w } = *self;
        Vector3::new(
            v * (2.0 * (y * x - z * w)),
            v * (w * w - x * x + y * y - z * z),
            v * (2.0 * (y * z + x * w)),
        )
    }

    /// Local Z (up) axis scaled by `v`
    pub fn z_axis(&self, v: f64) -> Vector3 {
        let Self { x, y, z, w } = *self;
        Vector3::new(
            v * (2.0 * (z * x + y * w)),
            v * (2.0 * (z * y - x * w)),
            v * (w * w - x * x - y * y + z * z),
        )
    }

    // Incremental rotations. `post_*` turns about the already-rotated axis
    // (self = self * delta); `pre_*` turns about the parent-frame axis
    // (self = delta * self).

    pub fn post_apply_x_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c + w * s, y * c + z * s, z * c - y * s, w * c - x * s);
        self
    }

    pub fn post_apply_y_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c - z * s, y * c + w * s, z * c + x * s, w * c - y * s);
        self
    }

    pub fn post_apply_z_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c + y * s, y * c - x * s, z * c + w * s, w * c - z * s);
        self
    }

    pub fn pre_apply_x_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c + w * s, y * c - z * s, z * c + y * s, w * c - x * s);
        self
    }

    pub fn pre_apply_y_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c + z * s, y * c + w * s, z * c - x * s, w * c - y * s);
        self
    }

    pub fn pre_apply_z_axis(&mut self, angle: f64) -> &mut Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let Self { x, y, z, w } = *self;
        *self = Self::new(x * c - y * s, y * c + x * s, z * c + w * s, w * c - z * s);
        self
    }

    /// Strip accumulated roll while keeping the look direction's pitch and yaw
    pub fn zero_roll(&mut self) -> &mut Self {
        let pitch = self.pitch();
        let yaw = self.yaw();
        *self = Self::IDENTITY;
        self.post_apply_x_axis(pitch).pre_apply_z_axis(yaw);
        self.normalise()
    }

    /// Get the conjugate of the quaternion
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Rotate `v` by this quaternion: `v + 2w(u×v) + 2(u×(u×v))`
    pub fn apply(&self, v: Vector3) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let uv = u.cross_3d(&v);
        let uuv = u.cross_3d(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Get the magnitude of the quaternion
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Normalise in place; a zero quaternion becomes `(1, 0, 0, 0)`
    pub fn normalise(&mut self) -> &mut Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            self.x = 1.0;
            return self;
        }
        self.x /= mag;
        self.y /= mag;
        self.z /= mag;
        self.w /= mag;
        self
    }

    /// Return a normalised copy
    pub fn normalised(&self) -> Self {
        let mut copy = *self;
        copy.normalise();
        copy
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MulAssign for Quaternion {
    /// Hamilton product in place: `self = self * rhs`
    fn mul_assign(&mut self, rhs: Self) {
        let (a, b) = (*self, rhs);
        *self = Quaternion::new(
            a.w * b.x + b.w * a.x + a.y * b.z - a.z * b.y,
            a.w * b.y + b.w * a.y + a.z * b.x - a.x * b.z,
            a.w * b.z + b.w * a.z + a.x * b.y - a.y * b.x,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        );
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(mut self, rhs: Self) -> Self::Output {
        self *= rhs;
        self
    }
}
