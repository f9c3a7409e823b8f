//! Per-frame driver
//!
//! The host calls in on two cadences: tracked-device ticks and render
//! ticks. Device ticks keep a watchdog armed; once they stop arriving for
//! the fallback period, render ticks take over in desktop mode.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::NavigationConfig;
use crate::error::{NavError, Result};
use crate::host::{RayHit, WorldHost};
use crate::input::{primary_ray_hit, ControllerSample, ControllerTracker, Hand};
use crate::navigation::{CameraNudge, GestureNavigator, NavigationInput, StepOutcome};
use crate::room::{DeviceState, DeviceType};
use crate::spatial::Pose;

/// What one update observed and did
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub device: DeviceType,
    pub outcome: StepOutcome,
    pub ray_hit: Option<RayHit>,
    /// Set when the controller payload could not be decoded this frame
    pub parse_failure: Option<String>,
}

pub struct FrameDriver {
    config: NavigationConfig,
    device: DeviceState,
    tracker: ControllerTracker,
    navigator: GestureNavigator,
    desktop_deadline: Option<Instant>,
}

impl FrameDriver {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            device: DeviceState::new(config.wall_height_threshold),
            tracker: ControllerTracker::new(),
            navigator: GestureNavigator::new(&config),
            desktop_deadline: None,
            config,
        }
    }

    pub fn device(&self) -> DeviceType {
        self.device.current()
    }

    pub fn navigator(&self) -> &GestureNavigator {
        &self.navigator
    }

    pub fn samples(&self) -> &[ControllerSample; 2] {
        self.tracker.samples()
    }

    /// Tracked-device tick: re-arm the desktop fallback and update
    pub fn device_frame<H: WorldHost + ?Sized>(
        &mut self,
        host: &mut H,
        now: Instant,
    ) -> Result<FrameReport> {
        self.desktop_deadline = Some(now + self.config.desktop_fallback());
        self.update(host)
    }

    /// Render tick: falls back to desktop once device ticks went quiet and
    /// updates only while on the desktop
    pub fn render_frame<H: WorldHost + ?Sized>(
        &mut self,
        host: &mut H,
        now: Instant,
    ) -> Result<Option<FrameReport>> {
        if self.desktop_deadline.is_some_and(|deadline| now >= deadline) {
            self.desktop_deadline = None;
            info!("Reentering desktop mode");
            self.device.revert_to_desktop();
            self.navigator.cancel();
        }
        if self.device.current() != DeviceType::Desktop {
            return Ok(None);
        }
        self.update(host).map(Some)
    }

    /// Console button press: tilt or turn the camera one step
    pub fn nudge<H: WorldHost + ?Sized>(&self, host: &mut H, nudge: CameraNudge) -> Pose {
        self.navigator.nudge(host, nudge)
    }

    fn update<H: WorldHost + ?Sized>(&mut self, host: &mut H) -> Result<FrameReport> {
        self.device.refresh_extent(&*host);
        let device = self.device.resolve();
        let camera = host.camera_pose();

        let mut parse_failure = None;
        if device == DeviceType::Desktop {
            self.tracker.ingest_mouse(host.mouse_flags());
        } else if let Some(raw) = host.controller_payload() {
            if let Err(err) = self.tracker.ingest_payload(&raw, &camera, host.headset_pose()) {
                parse_failure = Some(err.to_string());
            }
        } else {
            self.tracker.clear_edges();
        }

        let primary = self.tracker.sample(Hand::Primary);
        let wand = match device {
            DeviceType::Desktop => Some(camera),
            DeviceType::Table | DeviceType::Wall => primary.wand,
        };
        let ray_hit = primary_ray_hit(&*host, device, wand.as_ref());

        let input = NavigationInput {
            device,
            trigger: primary.trigger,
            wand,
            intersect: ray_hit.as_ref().map(|hit| hit.point),
            extent: self.device.extent().copied(),
        };
        let outcome = match self.navigator.step(host, &input) {
            Ok(outcome) => outcome,
            Err(err @ NavError::MissingWandPose) => {
                warn!(?device, "wand pose lost mid-drag, frame skipped");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        Ok(FrameReport {
            device,
            outcome,
            ray_hit,
            parse_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::host::MemoryHost;
    use crate::input::MouseFlags;
    use crate::spatial::{Pose, RoomExtent, Vector3};

    fn desktop_host() -> MemoryHost {
        let camera = Pose::at(0.0, 0.0, 1000.0).with_orientation(0.0, -60.0, 0.0);
        let mut host = MemoryHost::new(camera);
        host.cursor = Some(RayHit {
            point: Pose::at(10.0, 20.0, 0.0),
            object_id: None,
        });
        host
    }

    /// Square room of half-width `half` and height `height`
    fn room(half: f64, height: f64) -> RoomExtent {
        RoomExtent::new(Vector3::new(-half, -half, 0.0), Vector3::new(half, half, height))
    }

    #[test]
    fn test_desktop_drag_pans() {
        let mut driver = FrameDriver::new(NavigationConfig::default());
        let mut host = desktop_host();
        let now = Instant::now();

        host.mouse = MouseFlags(MouseFlags::MIDDLE_BUTTON);
        let report = driver.render_frame(&mut host, now).unwrap().unwrap();
        assert_eq!(report.device, DeviceType::Desktop);
        assert_eq!(report.outcome, StepOutcome::Started);
        assert!(driver.samples()[1].trigger_pressed);

        host.cursor = Some(RayHit {
            point: Pose::at(14.0, 23.0, 0.0),
            object_id: None,
        });
        let report = driver.render_frame(&mut host, now).unwrap().unwrap();
        assert_eq!(report.outcome, StepOutcome::Dragged { zoom_factor: None });
        assert_eq!((host.camera.x, host.camera.y), (-4.0, -3.0));
        assert!(!driver.samples()[1].trigger_pressed);

        host.mouse = MouseFlags::default();
        let report = driver.render_frame(&mut host, now).unwrap().unwrap();
        assert_eq!(report.outcome, StepOutcome::Released);
    }

    #[test]
    fn test_render_frame_idle_while_tracked() {
        let mut driver = FrameDriver::new(NavigationConfig::default());
        let mut host = desktop_host();
        host.extent = Some(room(1.0, 1.0));
        let start = Instant::now();

        let report = driver.device_frame(&mut host, start).unwrap();
        assert_eq!(report.device, DeviceType::Table);
        let early = driver.render_frame(&mut host, start + Duration::from_millis(500));
        assert!(early.unwrap().is_none());

        host.extent = None;
        let report = driver
            .render_frame(&mut host, start + Duration::from_millis(1000))
            .unwrap()
            .unwrap();
        assert_eq!(report.device, DeviceType::Desktop);
    }

    #[test]
    fn test_bad_payload_reported() {
        let mut driver = FrameDriver::new(NavigationConfig::default());
        let mut host = desktop_host();
        host.extent = Some(RoomExtent::new(Vector3::ZERO, Vector3::new(2.0, 2.0, 2.5)));
        host.payload = Some("{oops".to_string());

        let report = driver.device_frame(&mut host, Instant::now()).unwrap();
        assert_eq!(report.device, DeviceType::Wall);
        let failure = report.parse_failure.unwrap_or_default();
        assert!(failure.starts_with("Malformed controller payload"), "{}", failure);
        assert_eq!(report.outcome, StepOutcome::Idle);
    }

    #[test]
    fn test_wand_lost_mid_drag() {
        let mut driver = FrameDriver::new(NavigationConfig::default());
        let mut host = desktop_host();
        host.extent = Some(room(5.0, 1.0));
        host.pick_result.distance = 2.0;
        host.payload = Some(
            r#"{"IndexTrigger": [0, 1], "HavePosition": [false, true],
                "Position": [[0,0,0],[0,0,0]]}"#
                .to_string(),
        );
        let now = Instant::now();
        let report = driver.device_frame(&mut host, now).unwrap();
        assert_eq!(report.outcome, StepOutcome::Started);

        host.payload = Some(r#"{"IndexTrigger": [0, 1]}"#.to_string());
        let err = driver.device_frame(&mut host, now).unwrap_err();
        assert!(matches!(err, NavError::MissingWandPose));
    }

    #[test]
    fn test_console_nudge_turns_camera() {
        let mut driver = FrameDriver::new(NavigationConfig::default());
        let mut host = desktop_host();

        let camera = driver.nudge(&mut host, CameraNudge::TiltDown);
        assert_eq!(camera.pitch, -65.0);
        assert_eq!(host.camera, camera);
        assert_eq!(driver.nudge(&mut host, CameraNudge::YawLeft).yaw, 355.0);
    }
}
