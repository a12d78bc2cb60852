//! Utility modules shared by the packers.

pub mod fs;
pub mod html;
pub mod path;
