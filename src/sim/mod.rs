pub mod body;
pub mod population;

pub use body::Body;
pub use population::{DoublingTimer, Population};

use bevy::prelude::*;

/// Logical size of the overlay window. The simulation runs in this
/// display-pixel space (origin top-left, y down); positions are converted to
/// world coordinates only when sprites are moved.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}
