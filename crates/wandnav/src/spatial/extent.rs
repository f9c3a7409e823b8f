//! Physical bounds of the tracked volume

use serde::{Deserialize, Serialize};

use super::Vector3;
use crate::error::{NavError, Result};

/// Axis-aligned bounds of the tracked room volume.
///
/// Index 0 is the horizontal axis, 1 the table depth axis, 2 the height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomExtent {
    pub min: Vector3,
    pub max: Vector3,
}

/// Wire shape the host reports the extent in
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtentPayload {
    min_x: f64,
    min_y: f64,
    min_z: f64,
    max_x: f64,
    max_y: f64,
    max_z: f64,
}

impl RoomExtent {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Parse the host's `{"minX": .., "maxZ": ..}` extent report
    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: ExtentPayload =
            serde_json::from_str(payload).map_err(|e| NavError::InvalidExtent(e.to_string()))?;
        Ok(Self {
            min: Vector3::new(raw.min_x, raw.min_y, raw.min_z),
            max: Vector3::new(raw.max_x, raw.max_y, raw.max_z),
        })
    }

    /// Top of the volume
    pub fn height(&self) -> f64 {
        self.max.z()
    }

    /// Whether a room point lies within the extent grown by `margin`
    /// on the horizontal axis and on `vertical_axis`.
    pub fn accepts(
        &self,
        horizontal: f64,
        vertical: f64,
        vertical_axis: usize,
        margin: f64,
    ) -> bool {
        let within = |value: f64, axis: usize| {
            value >= self.min[axis] - margin && value <= self.max[axis] + margin
        };
        within(horizontal, 0) && within(vertical, vertical_axis)
    }
}
