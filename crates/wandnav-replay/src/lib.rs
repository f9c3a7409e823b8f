//! Frame script replay for wandnav
//!
//! A script is a JSON document holding the starting host state and a list
//! of frames. Each frame is delivered either as a tracked-device tick or a
//! render tick. Host fields a frame leaves out keep their previous value,
//! except the controller payload, which is only reported on frames that
//! carry one.
//!
//! ```json
//! {
//!   "camera": {"x": 0.0, "y": 0.0, "altitude": 1000.0},
//!   "extent": {"minX": -1, "minY": -1, "minZ": 0, "maxX": 1, "maxY": 1, "maxZ": 2.4},
//!   "frames": [
//!     {"tick": "device", "at_ms": 0, "pick": {"distance": 1.0},
//!      "payload": {"IndexTrigger": [0, 1], "HavePosition": [false, true],
//!                  "Position": [[0, 0, 0], [0, 0, 0]]}}
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use wandnav::{
    CameraNudge, DeviceType, FrameDriver, MemoryHost, MouseFlags, NavigationConfig, PickResult,
    Pose, RayHit, RoomExtent, Vector3,
};

/// Which host cadence delivers a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tick {
    Device,
    Render,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFrame {
    pub tick: Option<Tick>,
    /// Milliseconds since the start of the replay
    pub at_ms: u64,
    /// Controller report; a JSON string is passed through verbatim
    pub payload: Option<Value>,
    pub headset: Option<Pose>,
    pub mouse: Option<u32>,
    pub cursor: Option<RayHit>,
    pub pick: Option<PickResult>,
    /// Room extent in the host's `minX..maxZ` shape
    pub extent: Option<Value>,
    /// Tracker unplugged: the extent disappears
    pub tracker_lost: bool,
    /// Console button pressed before the tick
    pub nudge: Option<CameraNudge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub camera: Pose,
    /// World location of the room origin
    pub room_origin: Option<[f64; 3]>,
    pub extent: Option<Value>,
    pub frames: Vec<ScriptFrame>,
}

impl ReplayScript {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse replay script")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        Self::from_json(&source)
            .with_context(|| format!("Invalid replay script {}", path.display()))
    }
}

/// Result of replaying one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub frame: usize,
    pub tick: Tick,
    /// `None` when a render tick was skipped because a tracked device is active
    pub device: Option<DeviceType>,
    pub outcome: Option<String>,
    pub error: Option<String>,
    pub camera: Pose,
}

fn parse_extent(value: &Value) -> Result<RoomExtent> {
    RoomExtent::from_json(&value.to_string()).context("Invalid room extent")
}

fn payload_text(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Run every frame of `script` through a fresh driver
pub fn replay(script: &ReplayScript, config: NavigationConfig) -> Result<Vec<ReplayStep>> {
    let mut host = MemoryHost::new(script.camera);
    if let Some([x, y, z]) = script.room_origin {
        host.room_origin = Vector3::new(x, y, z);
    }
    host.extent = script.extent.as_ref().map(parse_extent).transpose()?;

    let mut driver = FrameDriver::new(config);
    let start = Instant::now();
    let mut steps = Vec::with_capacity(script.frames.len());

    for (index, frame) in script.frames.iter().enumerate() {
        if let Some(extent) = &frame.extent {
            host.extent = Some(parse_extent(extent).with_context(|| format!("frame {}", index))?);
        }
        if frame.tracker_lost {
            host.extent = None;
        }
        if let Some(mouse) = frame.mouse {
            host.mouse = MouseFlags(mouse);
        }
        if let Some(cursor) = &frame.cursor {
            host.cursor = Some(cursor.clone());
        }
        if let Some(pick) = &frame.pick {
            host.pick_result = pick.clone();
        }
        if frame.headset.is_some() {
            host.headset = frame.headset;
        }
        host.payload = frame.payload.as_ref().map(payload_text);
        if let Some(nudge) = frame.nudge {
            driver.nudge(&mut host, nudge);
        }

        let tick = frame.tick.unwrap_or(Tick::Device);
        let now = start + Duration::from_millis(frame.at_ms);
        let result = match tick {
            Tick::Device => driver.device_frame(&mut host, now).map(Some),
            Tick::Render => driver.render_frame(&mut host, now),
        };

        let (device, outcome, error) = match result {
            Ok(Some(report)) => {
                if let Some(failure) = &report.parse_failure {
                    warn!(frame = index, %failure, "controller payload rejected");
                }
                (Some(report.device), Some(format!("{:?}", report.outcome)), report.parse_failure)
            }
            Ok(None) => (None, None, None),
            Err(err) => {
                warn!(frame = index, error = %err, "frame aborted");
                (Some(driver.device()), None, Some(err.to_string()))
            }
        };
        debug!(
            frame = index,
            ?tick,
            ?device,
            x = host.camera.x,
            y = host.camera.y,
            altitude = host.camera.altitude,
            "frame replayed"
        );

        steps.push(ReplayStep {
            frame: index,
            tick,
            device,
            outcome,
            error,
            camera: host.camera,
        });
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL_SCRIPT: &str = r#"{
        "camera": {"x": 0.0, "y": 0.0, "altitude": 1000.0},
        "extent": {"minX": -1, "minY": -1, "minZ": 0, "maxX": 1, "maxY": 1, "maxZ": 2.4},
        "frames": [
            {"tick": "device", "at_ms": 0, "pick": {"distance": 1.0},
             "payload": {"IndexTrigger": [0, 1], "HavePosition": [false, true],
                         "Position": [[0, 0, 0], [0, 0, 0]],
                         "HaveOrientation": [false, true],
                         "Yaw": [0, 0], "Pitch": [0, 0], "Roll": [0, 0]}},
            {"tick": "device", "at_ms": 16,
             "payload": {"IndexTrigger": [0, 1], "HavePosition": [false, true],
                         "Position": [[0, 0, 0], [0, 0.5, 0]],
                         "HaveOrientation": [false, true],
                         "Yaw": [0, 0], "Pitch": [0, 0], "Roll": [0, 0]}},
            {"tick": "device", "at_ms": 32, "payload": "{broken"},
            {"tick": "render", "at_ms": 40, "nudge": "yaw_right"},
            {"tick": "render", "at_ms": 2000, "tracker_lost": true}
        ]
    }"#;

    #[test]
    fn test_replay_wall_script() {
        let script = ReplayScript::from_json(WALL_SCRIPT).unwrap();
        let steps = replay(&script, NavigationConfig::default()).unwrap();
        assert_eq!(steps.len(), 5);

        assert_eq!(steps[0].device, Some(DeviceType::Wall));
        assert_eq!(steps[0].outcome.as_deref(), Some("Started"));

        let zoomed = steps[1].camera.altitude;
        assert!((zoomed - 1000.0 * 5f64.sqrt()).abs() < 1e-6);

        assert!(steps[2].error.as_deref().unwrap_or_default().contains("Malformed"));
        assert_eq!(steps[2].camera.altitude, zoomed);

        assert_eq!(steps[3].device, None);
        assert_eq!(steps[3].camera.yaw, 5.0);
        assert_eq!(steps[4].device, Some(DeviceType::Desktop));
    }

    #[test]
    fn test_bad_extent_rejected() {
        let script = ReplayScript::from_json(r#"{"extent": {"minX": 1}}"#).unwrap();
        let err = replay(&script, NavigationConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Malformed room extent"), "{:#}", err);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ReplayScript::load("/no/such/script.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read replay script"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        fs::write(&path, WALL_SCRIPT).unwrap();
        let script = ReplayScript::load(&path).unwrap();
        assert_eq!(script.frames.len(), 5);
    }
}
