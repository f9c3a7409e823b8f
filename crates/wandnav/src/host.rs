//! The scene host the navigator drives
//!
//! Everything the core needs from the outside world goes through
//! [`WorldHost`]: the live camera, the tracker calibration, raw controller
//! input, and ray picking. [`MemoryHost`] keeps all of it in plain fields.

use serde::{Deserialize, Serialize};

use crate::input::MouseFlags;
use crate::spatial::{Pose, RoomExtent, Vector3};

/// Terrain or object hit of the primary pointing ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World position of the hit
    pub point: Pose,
    /// Scene object under the ray, if any
    #[serde(default)]
    pub object_id: Option<String>,
}

/// Result of casting the pick ray from a wand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickResult {
    /// Distance along the ray to the hit; `0.0` when nothing was hit
    pub distance: f64,
    #[serde(default)]
    pub object_id: Option<String>,
}

/// Collaborator contract implemented by the scene host
pub trait WorldHost {
    /// Current world camera pose
    fn camera_pose(&self) -> Pose;

    /// Move the world camera
    fn set_camera_pose(&mut self, pose: Pose);

    /// Tracker calibration: map a world position into raw room coordinates
    fn calibrate_to_room(&self, pose: &Pose) -> Pose;

    /// Tracker calibration: map raw room coordinates into a world position
    fn calibrate_to_world(&self, pose: &Pose) -> Pose;

    /// Bounds of the tracked volume, once the host knows them
    fn room_extent(&self) -> Option<RoomExtent>;

    /// Raw VR controller report for this frame
    fn controller_payload(&self) -> Option<String>;

    /// Headset pose, when tracked
    fn headset_pose(&self) -> Option<Pose>;

    /// Desktop mouse button flags
    fn mouse_flags(&self) -> MouseFlags;

    /// Terrain hit under the desktop mouse cursor
    fn cursor_hit(&self) -> Option<RayHit>;

    /// Cast the pick ray from `wand`
    fn pick(&self, wand: &Pose) -> PickResult;
}

/// In-memory host whose calibration is a pure translation by `room_origin`
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub camera: Pose,
    /// World location of the room origin
    pub room_origin: Vector3,
    pub extent: Option<RoomExtent>,
    pub payload: Option<String>,
    pub headset: Option<Pose>,
    pub mouse: MouseFlags,
    pub cursor: Option<RayHit>,
    pub pick_result: PickResult,
    /// Number of camera updates pushed by the navigator
    pub camera_writes: usize,
}

impl MemoryHost {
    pub fn new(camera: Pose) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }
}

impl WorldHost for MemoryHost {
    fn camera_pose(&self) -> Pose {
        self.camera
    }

    fn set_camera_pose(&mut self, pose: Pose) {
        self.camera = pose;
        self.camera_writes += 1;
    }

    fn calibrate_to_room(&self, pose: &Pose) -> Pose {
        Pose {
            x: pose.x - self.room_origin.x(),
            y: pose.y - self.room_origin.y(),
            altitude: pose.altitude - self.room_origin.z(),
            ..*pose
        }
    }

    fn calibrate_to_world(&self, pose: &Pose) -> Pose {
        Pose {
            x: pose.x + self.room_origin.x(),
            y: pose.y + self.room_origin.y(),
            altitude: pose.altitude + self.room_origin.z(),
            ..*pose
        }
    }

    fn room_extent(&self) -> Option<RoomExtent> {
        self.extent
    }

    fn controller_payload(&self) -> Option<String> {
        self.payload.clone()
    }

    fn headset_pose(&self) -> Option<Pose> {
        self.headset
    }

    fn mouse_flags(&self) -> MouseFlags {
        self.mouse
    }

    fn cursor_hit(&self) -> Option<RayHit> {
        self.cursor.clone()
    }

    fn pick(&self, _wand: &Pose) -> PickResult {
        self.pick_result.clone()
    }
}
