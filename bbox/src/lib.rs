//! Safe bounding box types and functions.
//!
//! Besides the axis-aligned [TLBR] rectangle, the crate provides
//! [QuadriBoxes], batches of oriented quadrilaterals used in rotated
//! object detection.

mod common;

pub use transform::*;
mod transform;

pub use rect::*;
pub mod rect;

pub use tlbr::*;
pub mod tlbr;

pub use hw::*;
pub mod hw;

pub use element::*;
pub mod element;

pub use flip::*;
pub mod flip;

pub use quadri::*;
pub mod quadri;

pub use quadri_boxes::*;
pub mod quadri_boxes;

pub mod prelude {
    pub use crate::rect::{Rect, RectNum};
}
