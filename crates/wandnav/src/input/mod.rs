//! Controller, mouse, and pointing-ray input

mod controller;
mod laser;
mod mouse;

pub use controller::{
    ControllerPayload, ControllerSample, ControllerTracker, Hand, WAND_RAY_DISTANCE,
};
pub use laser::primary_ray_hit;
pub use mouse::MouseFlags;
