//! Per-hand controller samples and button edge tracking
//!
//! Samples are rebuilt from raw input every frame. Only the previous
//! frame's button levels survive, so `*_pressed` can be latched as a
//! rising edge.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::MouseFlags;
use crate::error::{NavError, Result};
use crate::spatial::Pose;

/// Distance stamped on wand poses so the host pick ray reaches the horizon
pub const WAND_RAY_DISTANCE: f64 = 100_000.0;

/// Bits in the VR `Buttons` word, indexed by hand
const BUTTON1_MASKS: [u32; 2] = [0x200, 0x2];
const BUTTON2_MASKS: [u32; 2] = [0x100, 0x1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    /// Off hand, used for menus and tools
    Control,
    /// Pointing hand; drives the laser and the drag gesture
    Primary,
}

impl Hand {
    pub const ALL: [Hand; 2] = [Hand::Control, Hand::Primary];

    pub fn index(&self) -> usize {
        match self {
            Hand::Control => 0,
            Hand::Primary => 1,
        }
    }
}

/// One hand's state for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSample {
    pub trigger: bool,
    pub button1: bool,
    pub button2: bool,
    pub trigger_pressed: bool,
    pub button1_pressed: bool,
    pub button2_pressed: bool,
    /// World pose of the wand, when the tracker reported a position
    pub wand: Option<Pose>,
    pub head: Option<Pose>,
    pub scale_factor: Option<f64>,
}

impl ControllerSample {
    /// Build from button levels, latching edges against `previous`
    fn with_levels(
        previous: &ControllerSample,
        trigger: bool,
        button1: bool,
        button2: bool,
    ) -> Self {
        Self {
            trigger,
            button1,
            button2,
            trigger_pressed: trigger && !previous.trigger,
            button1_pressed: button1 && !previous.button1,
            button2_pressed: button2 && !previous.button2,
            ..Self::default()
        }
    }

    fn clear_edges(&mut self) {
        self.trigger_pressed = false;
        self.button1_pressed = false;
        self.button2_pressed = false;
    }
}

/// Raw VR controller report. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ControllerPayload {
    pub index_trigger: Option<[f64; 2]>,
    pub buttons: Option<u32>,
    pub have_position: Option<[bool; 2]>,
    /// Tracker `(x, vertical, depth)` per hand
    pub position: Option<[[f64; 3]; 2]>,
    pub have_orientation: Option<[bool; 2]>,
    pub yaw: Option<[f64; 2]>,
    pub pitch: Option<[f64; 2]>,
    pub roll: Option<[f64; 2]>,
    pub scale_factor: Option<f64>,
}

impl ControllerPayload {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| NavError::ParseFailure(e.to_string()))
    }

    fn trigger(&self, hand: usize) -> bool {
        self.index_trigger.map_or(false, |t| t[hand] != 0.0)
    }

    fn button(&self, masks: &[u32; 2], hand: usize) -> bool {
        self.buttons.map_or(false, |b| b & masks[hand] != 0)
    }

    fn has_position(&self, hand: usize) -> bool {
        self.have_position.map_or(false, |h| h[hand])
    }

    fn has_orientation(&self, hand: usize) -> bool {
        self.have_orientation.map_or(false, |h| h[hand])
    }

    /// Wand pose for `hand`, seeded from the camera so geographic fields carry over
    fn wand_pose(&self, hand: usize, camera: &Pose) -> Option<Pose> {
        if !self.has_position(hand) {
            return None;
        }
        let [x, vertical, depth] = self.position?[hand];
        let mut wand = Pose {
            x,
            y: depth,
            altitude: vertical,
            distance: WAND_RAY_DISTANCE,
            ..*camera
        };
        if self.has_orientation(hand) {
            wand.yaw = self.yaw.map_or(wand.yaw, |a| a[hand]);
            wand.pitch = self.pitch.map_or(wand.pitch, |a| a[hand]);
            wand.roll = self.roll.map_or(wand.roll, |a| a[hand]);
        }
        Some(wand)
    }
}

/// Holds the two hand samples across frames
#[derive(Debug, Clone, Default)]
pub struct ControllerTracker {
    samples: [ControllerSample; 2],
}

impl ControllerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both samples from a raw VR report.
    ///
    /// A malformed report clears this frame's edges, keeps the previous
    /// levels and poses, and is returned as [`NavError::ParseFailure`].
    pub fn ingest_payload(
        &mut self,
        raw: &str,
        camera: &Pose,
        headset: Option<Pose>,
    ) -> Result<()> {
        let payload = match ControllerPayload::parse(raw) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "controller payload parse error");
                self.clear_edges();
                return Err(err);
            }
        };

        for hand in Hand::ALL {
            let h = hand.index();
            let previous = &self.samples[h];
            let mut sample = ControllerSample::with_levels(
                previous,
                payload.trigger(h),
                payload.button(&BUTTON1_MASKS, h),
                payload.button(&BUTTON2_MASKS, h),
            );
            sample.wand = payload.wand_pose(h, camera);
            if sample.wand.is_some() && payload.has_orientation(h) {
                sample.head = headset.map(|head| Pose {
                    x: head.x,
                    y: head.y,
                    altitude: head.altitude,
                    yaw: head.yaw,
                    pitch: head.pitch,
                    roll: head.roll,
                    ..*camera
                });
            }
            sample.scale_factor = payload.scale_factor;
            self.samples[h] = sample;
        }
        Ok(())
    }

    /// Rebuild both samples from desktop mouse flags; no wand pose is reported
    pub fn ingest_mouse(&mut self, flags: MouseFlags) {
        for hand in Hand::ALL {
            let h = hand.index();
            self.samples[h] = ControllerSample::with_levels(
                &self.samples[h],
                flags.trigger(),
                flags.button1(),
                flags.button2(),
            );
        }
    }

    /// Forget this frame's rising edges, keeping levels
    pub fn clear_edges(&mut self) {
        for sample in &mut self.samples {
            sample.clear_edges();
        }
    }

    pub fn samples(&self) -> &[ControllerSample; 2] {
        &self.samples
    }

    pub fn sample(&self, hand: Hand) -> &ControllerSample {
        &self.samples[hand.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Pose {
        Pose::at(500.0, 600.0, 1000.0).with_orientation(10.0, -45.0, 0.0)
    }

    #[test]
    fn test_button_masks_per_hand() {
        let mut tracker = ControllerTracker::new();
        tracker
            .ingest_payload(r#"{"Buttons": 514, "IndexTrigger": [0.0, 0.7]}"#, &camera(), None)
            .unwrap();

        let control = tracker.sample(Hand::Control);
        assert!(control.button1 && !control.button2 && !control.trigger);
        let primary = tracker.sample(Hand::Primary);
        assert!(primary.button1 && !primary.button2 && primary.trigger);
    }

    #[test]
    fn test_edges_latch_once() {
        let mut tracker = ControllerTracker::new();
        let held = r#"{"IndexTrigger": [0.0, 1.0]}"#;
        tracker.ingest_payload(held, &camera(), None).unwrap();
        assert!(tracker.sample(Hand::Primary).trigger_pressed);

        tracker.ingest_payload(held, &camera(), None).unwrap();
        let primary = tracker.sample(Hand::Primary);
        assert!(primary.trigger && !primary.trigger_pressed);

        tracker.ingest_payload("{}", &camera(), None).unwrap();
        assert!(!tracker.sample(Hand::Primary).trigger);
    }

    #[test]
    fn test_wand_pose_axes() {
        let mut tracker = ControllerTracker::new();
        let raw = r#"{
            "HavePosition": [false, true],
            "Position": [[0, 0, 0], [1.5, 0.8, -0.4]],
            "HaveOrientation": [false, true],
            "Yaw": [0, 30], "Pitch": [0, -20], "Roll": [0, 5],
            "ScaleFactor": 2.0
        }"#;
        let head = Pose::at(0.1, 0.2, 1.7).with_orientation(3.0, 4.0, 5.0);
        tracker.ingest_payload(raw, &camera(), Some(head)).unwrap();

        assert!(tracker.sample(Hand::Control).wand.is_none());
        let primary = tracker.sample(Hand::Primary);
        let wand = primary.wand.unwrap();
        assert_eq!((wand.x, wand.y, wand.altitude), (1.5, -0.4, 0.8));
        assert_eq!((wand.yaw, wand.pitch, wand.roll), (30.0, -20.0, 5.0));
        assert_eq!(wand.distance, WAND_RAY_DISTANCE);
        assert_eq!(primary.head.unwrap().altitude, 1.7);
        assert_eq!(primary.scale_factor, Some(2.0));
    }

    #[test]
    fn test_wand_without_orientation_keeps_camera_heading() {
        let mut tracker = ControllerTracker::new();
        let raw = r#"{"HavePosition": [true, true], "Position": [[1, 2, 3], [4, 5, 6]]}"#;
        tracker.ingest_payload(raw, &camera(), Some(Pose::default())).unwrap();
        let control = tracker.sample(Hand::Control);
        let wand = control.wand.unwrap();
        assert_eq!((wand.yaw, wand.pitch), (10.0, -45.0));
        assert!(control.head.is_none());
    }

    #[test]
    fn test_parse_failure_clears_edges_keeps_levels() {
        let mut tracker = ControllerTracker::new();
        tracker
            .ingest_payload(r#"{"IndexTrigger": [1.0, 1.0]}"#, &camera(), None)
            .unwrap();

        let err = tracker.ingest_payload("{not json", &camera(), None).unwrap_err();
        assert!(matches!(err, NavError::ParseFailure(_)));
        let primary = tracker.sample(Hand::Primary);
        assert!(primary.trigger);
        assert!(!primary.trigger_pressed);
    }

    #[test]
    fn test_mouse_flags_drive_both_hands() {
        let mut tracker = ControllerTracker::new();
        tracker.ingest_mouse(MouseFlags(MouseFlags::MIDDLE_BUTTON | MouseFlags::LEFT_BUTTON));
        for sample in tracker.samples() {
            assert!(sample.trigger && sample.trigger_pressed);
            assert!(sample.button1 && sample.button1_pressed);
            assert!(!sample.button2);
            assert!(sample.wand.is_none());
        }

        tracker.ingest_mouse(MouseFlags(MouseFlags::MIDDLE_BUTTON));
        let primary = tracker.sample(Hand::Primary);
        assert!(primary.trigger && !primary.trigger_pressed && !primary.button1);
    }
}
