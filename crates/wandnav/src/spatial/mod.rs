//! Spatial primitives: vectors, quaternions, poses, and room bounds
//!
//! Quaternion math uses a right-handed frame:
//! - X: Right (+) / Left (-)
//! - Y: Forward (+) / Backward (-)
//! - Z: Up (+) / Down (-)

mod angles;
mod extent;
mod pose;
mod quaternion;
mod vector;

pub use angles::{degs_to_rads, rads_to_degs};
pub use extent::RoomExtent;
pub use pose::Pose;
pub use quaternion::{Quaternion, Ypr};
pub use vector::{Vector, Vector3};
