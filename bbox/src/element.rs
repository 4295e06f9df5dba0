use crate::common::*;

/// The scalar type of box coordinates.
pub trait Element: Float + Debug + 'static {}

impl<T> Element for T where T: Float + Debug + 'static {}
