use crate::common::*;

/// The axis to mirror boxes about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FlipDirection {
    /// Mirror left and right, `x' = w - x`.
    Horizontal,
    /// Mirror top and bottom, `y' = h - y`.
    Vertical,
    /// Both of the above.
    Diagonal,
}
