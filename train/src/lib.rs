//! Training driver utilities for the rotated detection project.

pub mod common;
pub mod config;
pub mod utils;
