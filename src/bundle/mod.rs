//! File operations producing the build output directory.

pub mod concat;
pub mod mirror;
