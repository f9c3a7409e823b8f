//! Device detection and room <-> world conversion

mod device;
mod transform;

pub use device::{DeviceState, DeviceType};
pub use transform::CoordinateTransform;
