//! Room <-> world pose conversion
//!
//! Tracked rigs go through the host calibration for position and compose
//! orientation against the live camera. Room space stores depth in `y` and
//! height in `altitude`, the reverse of world space, so the vertical fields
//! are swapped on the way in and out.
//!
//! The desktop rig has no tracker: its room is a virtual console hanging in
//! front of the camera, placed by fixed offsets along the camera heading.

use crate::host::WorldHost;
use crate::spatial::{degs_to_rads, rads_to_degs, Pose, Quaternion};

use super::DeviceType;

/// Fixed mount tilt of a table relative to the camera, degrees
const TABLE_PITCH_BIAS: f64 = 90.0;

/// Where a world point directly at the camera lands in desktop room space
const DESKTOP_CONSOLE_ORIGIN: (f64, f64, f64) = (0.0, 3.0, -1.3);
/// Console offsets applied along the camera heading when placing room points
const DESKTOP_CONSOLE_FORWARD: f64 = 2.0;
const DESKTOP_CONSOLE_RAISE: f64 = 0.7;

/// Converts poses for one device against the host's current camera
pub struct CoordinateTransform<'a, H: WorldHost + ?Sized> {
    host: &'a H,
    device: DeviceType,
}

impl<'a, H: WorldHost + ?Sized> CoordinateTransform<'a, H> {
    pub fn new(host: &'a H, device: DeviceType) -> Self {
        Self { host, device }
    }

    /// Map a world pose into room space
    pub fn world_to_room(&self, pose: &Pose) -> Pose {
        match self.device {
            DeviceType::Desktop => self.desktop_world_to_room(pose),
            DeviceType::Table | DeviceType::Wall => self.tracked_world_to_room(pose),
        }
    }

    /// Map a room pose into world space
    pub fn room_to_world(&self, pose: &Pose) -> Pose {
        match self.device {
            DeviceType::Desktop => self.desktop_room_to_world(pose),
            DeviceType::Table | DeviceType::Wall => self.tracked_room_to_world(pose),
        }
    }

    /// Camera orientation with the table mount tilt folded in
    fn camera_orientation(&self, camera: &Pose) -> Quaternion {
        let bias = match self.device {
            DeviceType::Wall => 0.0,
            DeviceType::Table | DeviceType::Desktop => TABLE_PITCH_BIAS,
        };
        Quaternion::from_ypr(
            degs_to_rads(camera.yaw),
            degs_to_rads(camera.pitch + bias),
            degs_to_rads(-camera.roll),
        )
    }

    fn tracked_world_to_room(&self, pose: &Pose) -> Pose {
        let calibrated = self.host.calibrate_to_room(pose);
        let item = Quaternion::from_ypr(
            degs_to_rads(calibrated.yaw),
            degs_to_rads(calibrated.pitch),
            degs_to_rads(-calibrated.roll),
        );
        let world = self.camera_orientation(&self.host.camera_pose());
        let ypr = (world.conjugate() * item).ypr();

        Pose {
            yaw: rads_to_degs(ypr.yaw),
            pitch: rads_to_degs(ypr.pitch),
            roll: rads_to_degs(ypr.roll),
            cartesian: true,
            ..calibrated
        }
        .with_swapped_vertical()
    }

    fn tracked_room_to_world(&self, pose: &Pose) -> Pose {
        let calibrated = self.host.calibrate_to_world(&pose.with_swapped_vertical());
        let item = Quaternion::from_ypr(
            degs_to_rads(calibrated.yaw),
            degs_to_rads(calibrated.pitch),
            degs_to_rads(calibrated.roll),
        );
        let world = self.camera_orientation(&self.host.camera_pose());
        let ypr = (world * item).ypr();

        Pose {
            yaw: rads_to_degs(ypr.yaw),
            pitch: rads_to_degs(ypr.pitch),
            roll: rads_to_degs(-ypr.roll),
            cartesian: true,
            ..calibrated
        }
    }

    fn desktop_world_to_room(&self, pose: &Pose) -> Pose {
        let camera = Pose {
            cartesian: true,
            ..self.host.camera_pose()
        };
        let camera_ori = Quaternion::from_ypr(
            degs_to_rads(camera.yaw),
            degs_to_rads(camera.pitch),
            degs_to_rads(camera.roll),
        );
        let item = Quaternion::from_ypr(
            degs_to_rads(pose.yaw),
            degs_to_rads(pose.pitch),
            degs_to_rads(pose.roll),
        );
        let ypr = (camera_ori.conjugate() * item).ypr();
        let aim = camera.aimed_at(pose);

        let (x, y, altitude) = DESKTOP_CONSOLE_ORIGIN;
        Pose::at(x, y, altitude)
            .with_orientation(
                rads_to_degs(ypr.yaw),
                rads_to_degs(ypr.pitch),
                rads_to_degs(ypr.roll),
            )
            .moved(camera.distance_to(pose), aim.yaw, aim.pitch)
    }

    fn desktop_room_to_world(&self, pose: &Pose) -> Pose {
        let camera = Pose {
            cartesian: true,
            ..self.host.camera_pose()
        };
        camera
            .moved(pose.y + DESKTOP_CONSOLE_FORWARD, camera.yaw, camera.pitch)
            .moved(pose.x, camera.yaw + 90.0, 0.0)
            .moved(pose.altitude + DESKTOP_CONSOLE_RAISE, camera.yaw, camera.pitch + 90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::spatial::Vector3;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table_host() -> MemoryHost {
        // Looking straight down cancels the table mount tilt
        MemoryHost::new(Pose::at(0.0, 0.0, 1000.0).with_orientation(0.0, -90.0, 0.0))
    }

    #[test]
    fn test_world_to_room_swaps_vertical_fields() {
        let host = table_host();
        let transform = CoordinateTransform::new(&host, DeviceType::Table);
        let room = transform.world_to_room(&Pose::at(1.0, 2.0, 3.0).with_distance(7.0));
        assert_eq!((room.x, room.y, room.altitude), (1.0, 3.0, 2.0));
        assert_eq!(room.distance, 7.0);
    }

    #[test]
    fn test_room_to_world_swaps_back() {
        let host = table_host();
        let transform = CoordinateTransform::new(&host, DeviceType::Table);
        let world = transform.room_to_world(&Pose::at(1.0, 3.0, 2.0));
        assert_eq!((world.x, world.y, world.altitude), (1.0, 2.0, 3.0));
    }

    #[test]
    fn test_calibration_applied_before_swap() {
        let mut host = table_host();
        host.room_origin = Vector3::new(10.0, 20.0, 30.0);
        let transform = CoordinateTransform::new(&host, DeviceType::Table);
        let room = transform.world_to_room(&Pose::at(11.0, 22.0, 33.0));
        assert_eq!((room.x, room.y, room.altitude), (1.0, 3.0, 2.0));
    }

    #[test]
    fn test_table_orientation_with_downward_camera() {
        let host = table_host();
        let transform = CoordinateTransform::new(&host, DeviceType::Table);
        let item = Pose::at(0.0, 0.0, 0.0).with_orientation(30.0, 10.0, 5.0);
        let room = transform.world_to_room(&item);
        assert!(close(room.yaw, 30.0));
        assert!(close(room.pitch, 10.0));
        // item roll enters negated and comes back as decomposed
        assert!(close(room.roll, -5.0));
    }

    #[test]
    fn test_wall_has_no_pitch_bias() {
        let host = MemoryHost::new(Pose::at(0.0, 0.0, 500.0));
        let wall = CoordinateTransform::new(&host, DeviceType::Wall);
        let room = wall.world_to_room(&Pose::at(0.0, 0.0, 0.0).with_orientation(-20.0, 15.0, 0.0));
        assert!(close(room.yaw, -20.0));
        assert!(close(room.pitch, 15.0));

        let table = CoordinateTransform::new(&host, DeviceType::Table);
        let room = table.world_to_room(&Pose::at(0.0, 0.0, 0.0).with_orientation(0.0, 0.0, 0.0));
        assert!(close(room.pitch, -90.0));
    }

    #[test]
    fn test_tracked_round_trip() {
        let camera = Pose::at(5.0, 5.0, 800.0).with_orientation(35.0, -60.0, 0.0);
        let mut host = MemoryHost::new(camera);
        host.room_origin = Vector3::new(-3.0, 4.0, 1.0);
        for device in [DeviceType::Table, DeviceType::Wall] {
            let transform = CoordinateTransform::new(&host, device);
            let world = Pose::at(2.0, -1.0, 0.5).with_orientation(12.0, 20.0, 8.0);
            let back = transform.room_to_world(&transform.world_to_room(&world));
            assert!(close(back.x, world.x) && close(back.y, world.y));
            assert!(close(back.altitude, world.altitude));
            assert!(close(back.yaw, world.yaw), "{:?} yaw {}", device, back.yaw);
            assert!(close(back.pitch, world.pitch), "{:?} pitch {}", device, back.pitch);
            assert!(close(back.roll, world.roll), "{:?} roll {}", device, back.roll);
        }
    }

    #[test]
    fn test_transform_leaves_input_untouched() {
        let host = table_host();
        let transform = CoordinateTransform::new(&host, DeviceType::Table);
        let room = Pose::at(1.0, 2.0, 3.0);
        let _ = transform.room_to_world(&room);
        assert_eq!(room, Pose::at(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_desktop_room_to_world_offsets() {
        let host = MemoryHost::new(Pose::at(0.0, 0.0, 100.0));
        let transform = CoordinateTransform::new(&host, DeviceType::Desktop);
        let world = transform.room_to_world(&Pose::at(1.0, 0.0, 0.0));
        // forward 2 along +Y, right 1 along +X, up 0.7
        assert!(close(world.x, 1.0));
        assert!(close(world.y, 2.0));
        assert!(close(world.altitude, 100.7));
    }

    #[test]
    fn test_desktop_world_to_room_places_on_console() {
        let host = MemoryHost::new(Pose::at(0.0, 0.0, 100.0));
        let transform = CoordinateTransform::new(&host, DeviceType::Desktop);

        let item = Pose::at(0.0, 10.0, 100.0).with_orientation(15.0, 0.0, 0.0);
        let room = transform.world_to_room(&item);
        assert!(close(room.x, 0.0));
        assert!(close(room.y, 13.0));
        assert!(close(room.altitude, -1.3));
        assert!(close(room.yaw, 15.0));

        // the camera itself sits at the console origin with its own orientation cancelled
        let room = transform.world_to_room(&host.camera);
        assert!(close(room.y, 3.0) && close(room.yaw, 0.0) && close(room.pitch, 0.0));
    }
}
