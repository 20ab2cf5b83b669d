// Author: Dustin Pilgrim
// License: MIT

pub mod error;
pub mod handle;
pub mod manager;
pub mod overlay;
pub mod rect;
pub mod settings;

pub use error::CropError;
pub use handle::{DragState, Handle, HandleId, HandleKind, MovementMask};
pub use manager::{ConstraintManager, RectObserver};
pub use overlay::CropOverlay;
pub use rect::{Point, Rect, Size};
pub use settings::CropSettings;
