// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

use crate::rect::Rect;

#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    #[error("frame {rect} is not contained in overlay bounds {bounds}")]
    OutOfBounds { rect: Rect, bounds: Rect },

    #[error("unknown handle \"{0}\"")]
    UnknownHandle(String),

    #[error("invalid geometry: {0}")]
    InvalidRect(String),
}
