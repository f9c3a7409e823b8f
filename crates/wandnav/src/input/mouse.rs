//! Desktop mouse button state

use serde::{Deserialize, Serialize};

/// Raw mouse flag word as the host window reports it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MouseFlags(pub u32);

impl MouseFlags {
    pub const LEFT_BUTTON: u32 = 1;
    pub const RIGHT_BUTTON: u32 = 2;
    /// Middle button doubles as the drag trigger
    pub const MIDDLE_BUTTON: u32 = 16;

    pub fn contains(&self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    pub fn trigger(&self) -> bool {
        self.contains(Self::MIDDLE_BUTTON)
    }

    pub fn button1(&self) -> bool {
        self.contains(Self::LEFT_BUTTON)
    }

    pub fn button2(&self) -> bool {
        self.contains(Self::RIGHT_BUTTON)
    }
}
