//! Which rig is attached, and the room bounds it reported

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::host::WorldHost;
use crate::spatial::RoomExtent;

/// Physical rig driving the navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Horizontal tracked projection table
    Table,
    /// Vertical tracked projection wall
    Wall,
    /// Mouse and keyboard; the "room" is a virtual console in front of the camera
    Desktop,
}

impl DeviceType {
    /// Room axis treated as vertical on screen: table depth (1) or room height (2)
    pub fn room_vertical_axis(&self) -> usize {
        match self {
            DeviceType::Table => 1,
            DeviceType::Wall | DeviceType::Desktop => 2,
        }
    }
}

/// Current device plus the lazily fetched room extent.
///
/// Starts on the desktop. Once the host reports an extent the device
/// resolves to a wall (tall room) or a table, and stays there until
/// [`DeviceState::revert_to_desktop`].
#[derive(Debug, Clone)]
pub struct DeviceState {
    device: DeviceType,
    extent: Option<RoomExtent>,
    wall_height_threshold: f64,
}

impl DeviceState {
    pub fn new(wall_height_threshold: f64) -> Self {
        Self {
            device: DeviceType::Desktop,
            extent: None,
            wall_height_threshold,
        }
    }

    /// Device as last resolved
    pub fn current(&self) -> DeviceType {
        self.device
    }

    pub fn extent(&self) -> Option<&RoomExtent> {
        self.extent.as_ref()
    }

    /// Ask the host for the room extent unless it is already cached
    pub fn refresh_extent<H: WorldHost + ?Sized>(&mut self, host: &H) {
        if self.extent.is_none() {
            self.extent = host.room_extent();
            if let Some(extent) = &self.extent {
                debug!(min = ?extent.min.data, max = ?extent.max.data, "room extent cached");
            }
        }
    }

    /// Pick table or wall once the extent is known
    pub fn resolve(&mut self) -> DeviceType {
        if self.device == DeviceType::Desktop {
            if let Some(extent) = &self.extent {
                self.device = if extent.height() > self.wall_height_threshold {
                    info!(height = extent.height(), "Entering wall mode");
                    DeviceType::Wall
                } else {
                    info!(height = extent.height(), "Entering table mode");
                    DeviceType::Table
                };
            }
        }
        self.device
    }

    /// Drop back to desktop and forget the extent
    pub fn revert_to_desktop(&mut self) {
        self.device = DeviceType::Desktop;
        self.extent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::spatial::Vector3;

    fn extent(height: f64) -> RoomExtent {
        RoomExtent::new(Vector3::new(-1.0, -1.0, 0.0), Vector3::new(1.0, 1.0, height))
    }

    #[test]
    fn test_desktop_until_extent_known() {
        let mut state = DeviceState::new(1.9);
        let host = MemoryHost::default();
        state.refresh_extent(&host);
        assert_eq!(state.resolve(), DeviceType::Desktop);
        assert!(state.extent().is_none());
    }

    #[test]
    fn test_resolves_table_and_wall() {
        let mut host = MemoryHost::default();
        host.extent = Some(extent(1.2));
        let mut state = DeviceState::new(1.9);
        state.refresh_extent(&host);
        assert_eq!(state.resolve(), DeviceType::Table);

        host.extent = Some(extent(2.4));
        let mut state = DeviceState::new(1.9);
        state.refresh_extent(&host);
        assert_eq!(state.resolve(), DeviceType::Wall);
    }

    #[test]
    fn test_extent_fetched_once() {
        let mut host = MemoryHost::default();
        host.extent = Some(extent(1.2));
        let mut state = DeviceState::new(1.9);
        state.refresh_extent(&host);

        host.extent = Some(extent(3.0));
        state.refresh_extent(&host);
        assert_eq!(state.extent().map(|e| e.height()), Some(1.2));
        assert_eq!(state.resolve(), DeviceType::Table);
    }

    #[test]
    fn test_revert_to_desktop() {
        let mut host = MemoryHost::default();
        host.extent = Some(extent(2.4));
        let mut state = DeviceState::new(1.9);
        state.refresh_extent(&host);
        state.resolve();

        state.revert_to_desktop();
        assert_eq!(state.current(), DeviceType::Desktop);
        assert!(state.extent().is_none());
    }

    #[test]
    fn test_vertical_axis() {
        assert_eq!(DeviceType::Table.room_vertical_axis(), 1);
        assert_eq!(DeviceType::Wall.room_vertical_axis(), 2);
        assert_eq!(DeviceType::Desktop.room_vertical_axis(), 2);
    }
}
