//! State carried across frames while the trigger is held

use crate::spatial::{degs_to_rads, Pose, Quaternion, Vector3};

/// Wand position and aim direction in room space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WandFrame {
    pub position: Vector3,
    /// Unit forward axis of the wand
    pub direction: Vector3,
}

impl WandFrame {
    /// Derive from a room-space wand pose. Room yaw turns the opposite
    /// way to the quaternion convention, hence the negation.
    pub fn from_room_pose(pose: &Pose) -> Self {
        let orientation = Quaternion::from_ypr(
            -degs_to_rads(pose.yaw),
            degs_to_rads(pose.pitch),
            degs_to_rads(pose.roll),
        );
        Self {
            position: Vector3::new(pose.x, pose.y, pose.altitude),
            direction: orientation.y_axis(1.0),
        }
    }
}

/// One continuous trigger hold
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// World intersect captured when the drag started; panning keeps it under the wand
    pub anchor: Pose,
    /// Wand frame of the last processed frame
    pub previous: WandFrame,
}

impl DragSession {
    pub fn new(anchor: Pose, wand: WandFrame) -> Self {
        Self {
            anchor,
            previous: wand,
        }
    }
}
