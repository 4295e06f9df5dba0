pub use anyhow::{ensure, format_err, Result};
pub use log::warn;
pub use ndarray::{Array, Array2, ArrayD, ArrayView1, ArrayView2, Axis, Dimension, IxDyn};
pub use num_traits::{Float, Num, Zero};
pub use std::{
    fmt::Debug,
    ops::{Mul, Neg},
};
pub use strum::{AsRefStr, Display, EnumString};
