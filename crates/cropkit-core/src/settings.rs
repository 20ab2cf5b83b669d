// Author: Dustin Pilgrim
// License: MIT

use crate::rect::Size;

pub const DEFAULT_MINIMUM_SIZE: Size = Size::new(50.0, 50.0);
pub const DEFAULT_INSET: f64 = 30.0;
pub const DEFAULT_TOUCH_TARGET: f64 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSettings {
    /// Width/height floor enforced while dragging.
    pub minimum_size: Size,

    /// Padding between the surface edge and the initial crop rectangle.
    pub inset: f64,

    /// Side of the square hit area around each handle.
    pub touch_target: f64,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            minimum_size: DEFAULT_MINIMUM_SIZE,
            inset: DEFAULT_INSET,
            touch_target: DEFAULT_TOUCH_TARGET,
        }
    }
}
