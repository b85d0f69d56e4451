//! Generator command construction

pub mod cmake;

pub use cmake::{CMake, ToolCommand, DEFAULT_CMAKE};
