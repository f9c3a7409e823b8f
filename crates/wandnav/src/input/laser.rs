//! Primary pointing ray

use tracing::trace;

use crate::host::{RayHit, WorldHost};
use crate::room::DeviceType;
use crate::spatial::Pose;

/// Resolve where the primary pointer meets the scene.
///
/// The desktop uses the host's mouse-cursor hit. Tracked rigs cast the
/// pick ray from `wand`; a miss is placed at half the camera altitude
/// along the ray with no object attached.
pub fn primary_ray_hit<H: WorldHost + ?Sized>(
    host: &H,
    device: DeviceType,
    wand: Option<&Pose>,
) -> Option<RayHit> {
    if device == DeviceType::Desktop {
        return host.cursor_hit();
    }

    let wand = wand?;
    let pick = host.pick(wand);
    let (distance, object_id) = if pick.distance == 0.0 {
        (host.camera_pose().altitude / 2.0, None)
    } else {
        (pick.distance, pick.object_id)
    };
    trace!(distance, hit = object_id.is_some(), "laser pick");

    let point = Pose {
        cartesian: true,
        ..wand.moved(distance, wand.yaw, wand.pitch)
    };
    Some(RayHit { point, object_id })
}
