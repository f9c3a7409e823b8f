//! wandnav: gesture-driven navigation for tracked wand rigs
//!
//! This crate turns per-frame controller or mouse state into camera moves
//! over a geospatial scene:
//! - Fixed-size vector and quaternion algebra for orientation math
//! - Room <-> world pose transforms for table, wall, and desktop rigs
//! - Controller payload decoding with button edge tracking
//! - A drag state machine that pans and zooms the camera
//! - A frame driver that ties the pieces to a [`WorldHost`]

pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod input;
pub mod navigation;
pub mod room;
pub mod spatial;

// Re-export commonly used types
pub use config::{NavigationConfig, ZoomPolicy};
pub use error::{NavError, Result};
pub use frame::{FrameDriver, FrameReport};
pub use host::{MemoryHost, PickResult, RayHit, WorldHost};
pub use input::{ControllerSample, ControllerTracker, Hand, MouseFlags};
pub use navigation::{CameraNudge, DragSession, GestureNavigator, NavigationInput, StepOutcome};
pub use room::{CoordinateTransform, DeviceState, DeviceType};
pub use spatial::{Pose, Quaternion, RoomExtent, Vector, Vector3, Ypr};
