//! Project configuration

pub mod cmtask_toml;

pub use cmtask_toml::CmtaskConfig;
