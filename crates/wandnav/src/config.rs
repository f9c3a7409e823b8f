//! Navigation tuning loaded from TOML
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock behaviour:
//!
//! ```toml
//! deadzone = 1.0
//! wall_height_threshold = 1.9
//! desktop_fallback_ms = 1000
//! camera_nudge_deg = 5.0
//!
//! [zoom]
//! base_ratio = 5.0
//! altitude_floor = 250.0
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::room::DeviceType;

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Policy constants for the zoom heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    /// Altitude multiplier for one unit of zoom power
    pub base_ratio: f64,
    /// Motion angles at or below this (degrees) count fully as zoom
    pub falloff_lower_deg: f64,
    /// Motion angles at or above this (degrees) do not zoom at all
    pub falloff_upper_deg: f64,
    /// Wand deltas at or above this length are treated as tracking glitches
    pub max_frame_delta: f64,
    pub power_gain: f64,
    /// Wall zoom authority is `altitude / wall_damping_altitude`, clamped
    pub wall_damping_altitude: f64,
    pub wall_damping_min: f64,
    pub table_ceiling: f64,
    pub wall_ceiling: f64,
    pub altitude_floor: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            base_ratio: 5.0,
            falloff_lower_deg: 25.0,
            falloff_upper_deg: 40.0,
            max_frame_delta: 1.0,
            power_gain: 2.0,
            wall_damping_altitude: 2000.0,
            wall_damping_min: 0.25,
            table_ceiling: 500_000.0,
            wall_ceiling: 60_000.0,
            altitude_floor: 250.0,
        }
    }
}

impl ZoomPolicy {
    /// Altitude ceiling for a device; the desktop console is unbounded
    pub fn ceiling(&self, device: DeviceType) -> Option<f64> {
        match device {
            DeviceType::Table => Some(self.table_ceiling),
            DeviceType::Wall => Some(self.wall_ceiling),
            DeviceType::Desktop => None,
        }
    }

    /// Clamp an altitude into `[altitude_floor, ceiling(device)]`
    pub fn clamp_altitude(&self, altitude: f64, device: DeviceType) -> f64 {
        let capped = match self.ceiling(device) {
            Some(ceiling) if altitude > ceiling => ceiling,
            _ => altitude,
        };
        capped.max(self.altitude_floor)
    }

    /// Linear falloff: 1 at or below the lower angle, 0 at or above the upper
    pub fn alignment_ratio(&self, degrees: f64) -> f64 {
        let range = self.falloff_upper_deg - self.falloff_lower_deg;
        let excess = (degrees.max(self.falloff_lower_deg) - self.falloff_lower_deg).min(range);
        1.0 - excess / range
    }

    /// Zoom authority multiplier; only walls are damped near the ground
    pub fn damping(&self, altitude: f64, device: DeviceType) -> f64 {
        match device {
            DeviceType::Wall => {
                (altitude / self.wall_damping_altitude).clamp(self.wall_damping_min, 1.0)
            }
            DeviceType::Table | DeviceType::Desktop => 1.0,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.falloff_upper_deg <= self.falloff_lower_deg {
            return Err(NavError::Config(format!(
                "zoom.falloff_upper_deg ({}) must exceed zoom.falloff_lower_deg ({})",
                self.falloff_upper_deg, self.falloff_lower_deg
            )));
        }
        if !positive(self.base_ratio) {
            return Err(NavError::Config("zoom.base_ratio must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.wall_damping_min) {
            return Err(NavError::Config(format!(
                "zoom.wall_damping_min ({}) must lie within [0, 1]",
                self.wall_damping_min
            )));
        }
        if !positive(self.wall_damping_altitude) {
            return Err(NavError::Config(
                "zoom.wall_damping_altitude must be positive".to_string(),
            ));
        }
        if !positive(self.max_frame_delta) {
            return Err(NavError::Config("zoom.max_frame_delta must be positive".to_string()));
        }
        if self.altitude_floor > self.wall_ceiling.min(self.table_ceiling) {
            return Err(NavError::Config(
                "zoom.altitude_floor must not exceed the device ceilings".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level navigation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Margin beyond the room extent that still accepts pointing input
    pub deadzone: f64,
    /// Rooms taller than this are wall installations
    pub wall_height_threshold: f64,
    /// Silence on the device channel for this long reverts to desktop mode
    pub desktop_fallback_ms: u64,
    /// Pitch or yaw step of one camera nudge (degrees)
    pub camera_nudge_deg: f64,
    pub zoom: ZoomPolicy,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            deadzone: 1.0,
            wall_height_threshold: 1.9,
            desktop_fallback_ms: 1000,
            camera_nudge_deg: 5.0,
            zoom: ZoomPolicy::default(),
        }
    }
}

impl NavigationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: NavigationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source).map_err(|e| match e {
            NavError::Config(msg) => NavError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn desktop_fallback(&self) -> Duration {
        Duration::from_millis(self.desktop_fallback_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.deadzone < 0.0 {
            return Err(NavError::Config("deadzone must not be negative".to_string()));
        }
        if !positive(self.camera_nudge_deg) {
            return Err(NavError::Config("camera_nudge_deg must be positive".to_string()));
        }
        self.zoom.validate()
    }
}
