//! Gesture-driven pan and zoom

mod navigator;
mod session;

pub use navigator::{CameraNudge, GestureNavigator, NavigationInput, StepOutcome};
pub use session::{DragSession, WandFrame};
