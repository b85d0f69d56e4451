//! Tool detection with helpful errors when the generator is missing

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use which::which;

use crate::error::{hints, CmtaskError};

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// Tool version string (if available)
    pub version: Option<String>,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    let path = which(tool_name).ok()?;
    Some(ToolInfo {
        name: tool_name.to_string(),
        version: get_tool_version(&path),
        path,
    })
}

/// Get tool version by running `tool --version`
fn get_tool_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout);
    version
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Turn a spawn failure into the most helpful error
///
/// A `NotFound` for a program that is also absent from PATH becomes
/// [`CmtaskError::MissingTool`] with an install hint.
pub fn launch_error(program: &str, required_for: &str, source: io::Error) -> CmtaskError {
    if source.kind() == io::ErrorKind::NotFound && which(program).is_err() {
        return CmtaskError::missing_tool(program, required_for, hints::cmake());
    }
    CmtaskError::launch(program, source)
}
