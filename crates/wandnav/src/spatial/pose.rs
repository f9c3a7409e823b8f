//! Host-style position with orientation
//!
//! Mirrors the position object the scene host hands out: a location, a
//! yaw/pitch/roll in degrees, a view distance, and a flag telling whether
//! `x`/`y` are Cartesian metres or geographic coordinates. The geometry
//! helpers below assume Cartesian metres.

use serde::{Deserialize, Serialize};

use super::angles::{degs_to_rads, rads_to_degs};
use super::Vector3;

/// A world or room pose.
///
/// Yaw is a compass heading (0 = +Y, clockwise), pitch is positive upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub distance: f64,
    pub cartesian: bool,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            altitude: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            distance: 0.0,
            cartesian: true,
        }
    }
}

impl Pose {
    /// Create a Cartesian pose with a location only
    pub fn at(x: f64, y: f64, altitude: f64) -> Self {
        Self {
            x,
            y,
            altitude,
            ..Self::default()
        }
    }

    /// Replace the orientation (degrees)
    pub fn with_orientation(mut self, yaw: f64, pitch: f64, roll: f64) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Location as `(x, y, altitude)`
    pub fn location(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.altitude)
    }

    fn with_location(mut self, location: Vector3) -> Self {
        self.x = location.x();
        self.y = location.y();
        self.altitude = location.z();
        self
    }

    /// Exchange `y` and `altitude`
    pub fn with_swapped_vertical(mut self) -> Self {
        std::mem::swap(&mut self.y, &mut self.altitude);
        self
    }

    /// Translate `distance` along the heading given by `yaw`/`pitch` (degrees)
    pub fn moved(self, distance: f64, yaw: f64, pitch: f64) -> Self {
        let yaw = degs_to_rads(yaw);
        let pitch = degs_to_rads(pitch);
        let step = Vector3::new(
            pitch.cos() * yaw.sin(),
            pitch.cos() * yaw.cos(),
            pitch.sin(),
        );
        let location = self.location() + step * distance;
        self.with_location(location)
    }

    /// Euclidean distance over `(x, y, altitude)`
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.location() - self.location()).magnitude()
    }

    /// Translate `distance` towards `target`; negative values move away.
    /// Coincident poses stay put.
    pub fn moved_toward(self, target: &Pose, distance: f64) -> Self {
        let offset = target.location() - self.location();
        if offset.magnitude() == 0.0 {
            return self;
        }
        let location = self.location() + offset.normalised() * distance;
        self.with_location(location)
    }

    /// Turn the pose so it looks at `target`, keeping roll
    pub fn aimed_at(mut self, target: &Pose) -> Self {
        let offset = target.location() - self.location();
        let horizontal = offset.x().hypot(offset.y());
        if horizontal == 0.0 && offset.z() == 0.0 {
            return self;
        }
        self.yaw = rads_to_degs(offset.x().atan2(offset.y()));
        self.pitch = rads_to_degs(offset.z().atan2(horizontal));
        self
    }
}
