//! Common imports from external crates.

pub use anyhow::{bail, format_err, Context, Result};
pub use log::{info, warn};
pub use serde::{Deserialize, Serialize};
pub use serde_json::{Map, Value};
pub use std::{
    fs,
    path::{Path, PathBuf},
};
