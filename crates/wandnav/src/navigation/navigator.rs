//! Drag-to-navigate state machine
//!
//! Idle until the primary trigger goes down over a valid intersect, then
//! Dragging until it is released. While dragging, each frame pans the
//! camera so the anchor stays under the wand and may zoom when the wand
//! moves along its own aim axis.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::session::{DragSession, WandFrame};
use crate::config::{NavigationConfig, ZoomPolicy};
use crate::error::{NavError, Result};
use crate::host::WorldHost;
use crate::room::{CoordinateTransform, DeviceType};
use crate::spatial::{rads_to_degs, Pose, RoomExtent};

/// Everything the navigator reads for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationInput {
    pub device: DeviceType,
    /// Primary trigger level
    pub trigger: bool,
    /// World pose of the pointing wand (the camera on desktop)
    pub wand: Option<Pose>,
    /// World point the primary ray hit
    pub intersect: Option<Pose>,
    /// Cached room bounds; without them every intersect is accepted
    pub extent: Option<RoomExtent>,
}

/// Fixed camera turns bound to the console buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraNudge {
    TiltUp,
    TiltDown,
    YawLeft,
    YawRight,
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Trigger up with no session
    Idle,
    /// A session was opened this frame
    Started,
    /// The camera was moved; `zoom_factor` is set when the altitude changed too
    Dragged { zoom_factor: Option<f64> },
    /// The session ended this frame
    Released,
    /// Trigger held but the ray hit nothing
    NoIntersect,
    /// The intersect fell outside the room extent plus deadzone
    OutOfBounds,
}

#[derive(Debug, Clone)]
pub struct GestureNavigator {
    deadzone: f64,
    nudge_deg: f64,
    zoom: ZoomPolicy,
    session: Option<DragSession>,
}

impl GestureNavigator {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            deadzone: config.deadzone,
            nudge_deg: config.camera_nudge_deg,
            zoom: config.zoom,
            session: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Drop any open session without touching the camera
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("drag session cancelled");
        }
    }

    /// Turn the camera in place by one nudge step and return the new pose.
    ///
    /// Yaw wraps into `[0, 360)`; pitch stops at straight up or down. An
    /// open drag session keeps its anchor.
    pub fn nudge<H: WorldHost + ?Sized>(&self, host: &mut H, nudge: CameraNudge) -> Pose {
        let mut camera = host.camera_pose();
        match nudge {
            CameraNudge::TiltUp => camera.pitch += self.nudge_deg,
            CameraNudge::TiltDown => camera.pitch -= self.nudge_deg,
            CameraNudge::YawLeft => camera.yaw -= self.nudge_deg,
            CameraNudge::YawRight => camera.yaw += self.nudge_deg,
        }
        camera.yaw = camera.yaw.rem_euclid(360.0);
        camera.pitch = camera.pitch.clamp(-90.0, 90.0);
        debug!(?nudge, yaw = camera.yaw, pitch = camera.pitch, "camera nudged");
        host.set_camera_pose(camera);
        camera
    }

    /// Advance one frame.
    ///
    /// Fails with [`NavError::MissingWandPose`] when a drag is in progress
    /// and the wand pose has gone missing.
    pub fn step<H: WorldHost + ?Sized>(
        &mut self,
        host: &mut H,
        input: &NavigationInput,
    ) -> Result<StepOutcome> {
        if !input.trigger {
            return Ok(match self.session.take() {
                Some(_) => {
                    debug!("drag session ended");
                    StepOutcome::Released
                }
                None => StepOutcome::Idle,
            });
        }

        let Some(wand) = input.wand.as_ref() else {
            if self.is_dragging() {
                return Err(NavError::MissingWandPose);
            }
            return Ok(StepOutcome::Idle);
        };

        let (frame, intersect) = {
            let transform = CoordinateTransform::new(&*host, input.device);
            let frame = WandFrame::from_room_pose(&transform.world_to_room(wand));

            let Some(intersect) = input.intersect else {
                return Ok(StepOutcome::NoIntersect);
            };
            let room = transform.world_to_room(&intersect);
            let vertical = match input.device.room_vertical_axis() {
                1 => room.y,
                _ => room.altitude,
            };
            if let Some(extent) = &input.extent {
                let axis = input.device.room_vertical_axis();
                if !extent.accepts(room.x, vertical, axis, self.deadzone) {
                    trace!(x = room.x, vertical, "intersect outside room extent");
                    return Ok(StepOutcome::OutOfBounds);
                }
            }
            (frame, intersect)
        };

        let session = match self.session.as_mut() {
            Some(session) => session,
            None => {
                debug!(x = intersect.x, y = intersect.y, "drag session started");
                self.session = Some(DragSession::new(intersect, frame));
                return Ok(StepOutcome::Started);
            }
        };

        let camera = host.camera_pose();
        let mut target = camera;
        let mut intersect = intersect;
        let zoom_factor = frame_zoom_factor(
            &self.zoom,
            &session.previous,
            &frame,
            camera.altitude,
            input.device,
        );

        if let Some(factor) = zoom_factor {
            target.altitude *= factor;
            intersect = Pose {
                cartesian: true,
                ..intersect
            };
            let pull = (1.0 - factor) * intersect.distance_to(&camera);
            intersect = intersect.moved_toward(&camera, pull);
            target.altitude = self.zoom.clamp_altitude(target.altitude, input.device);
            debug!(factor, altitude = target.altitude, "zoom");
        }

        target.x += session.anchor.x - intersect.x;
        target.y += session.anchor.y - intersect.y;

        session.previous = frame;
        host.set_camera_pose(target);
        Ok(StepOutcome::Dragged { zoom_factor })
    }
}

/// Altitude multiplier for the wand motion between two frames, or `None`
/// when the motion is zero or implausibly large.
fn frame_zoom_factor(
    zoom: &ZoomPolicy,
    previous: &WandFrame,
    current: &WandFrame,
    altitude: f64,
    device: DeviceType,
) -> Option<f64> {
    let delta = current.position - previous.position;
    let magnitude = delta.magnitude();
    if !(magnitude > 0.0 && magnitude < zoom.max_frame_delta) {
        return None;
    }

    let sign = if delta.dot(&previous.direction) >= 0.0 { 1.0 } else { -1.0 };
    // pushing along either end of the aim axis counts the same
    let angle = delta.angle(&previous.direction);
    let ratio = zoom.alignment_ratio(rads_to_degs(angle.min(PI - angle)));

    let power = sign * ratio * magnitude * zoom.power_gain;
    Some(zoom.base_ratio.powf(power * zoom.damping(altitude, device)))
}
