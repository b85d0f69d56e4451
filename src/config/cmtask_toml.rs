//! cmtask.toml configuration parsing
//!
//! The file is optional. When present it supplies fallbacks for values not
//! given on the command line or in the environment:
//!
//! ```toml
//! [cmake]
//! program = "cmake"
//! build_path = "build"
//! generator = "Ninja"
//!
//! [output]
//! stream = false
//! ```

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{hints, CmtaskError};
use crate::utils::paths::find_upwards;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "cmtask.toml";

/// Root configuration from cmtask.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CmtaskConfig {
    /// Generator settings
    #[serde(default)]
    pub cmake: CMakeSection,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,

    /// Directory holding the loaded file, as seen from the working directory
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// `[cmake]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CMakeSection {
    /// Generator executable
    pub program: Option<String>,

    /// Build directory
    pub build_path: Option<PathBuf>,

    /// Generator name passed with -G
    pub generator: Option<String>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Relay child output through pipes
    #[serde(default)]
    pub stream: bool,
}

impl CmtaskConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CmtaskError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CmtaskError::config_error(format!(
                "Failed to read configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&content).map_err(|e| match e {
            CmtaskError::Config { message, hint } => CmtaskError::Config {
                message: format!("{} ({})", message, path.display()),
                hint,
            },
            other => other,
        })
    }

    /// Build directory from the file, anchored at the file's directory
    pub fn build_path(&self) -> Option<PathBuf> {
        self.cmake
            .build_path
            .as_ref()
            .map(|path| self.base_dir.join(path))
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, CmtaskError> {
        toml::from_str(content).map_err(|e| {
            CmtaskError::config_error_with_hint(
                format!("Failed to parse {}: {}", CONFIG_FILE, e.message()),
                hints::invalid_config(),
            )
        })
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Otherwise cmtask.toml is searched from
    /// `start` upward, and its absence yields the defaults.
    ///
    /// Relative paths inside the file are taken relative to the directory
    /// holding it.
    pub fn discover(explicit: Option<&Path>, start: &Path) -> Result<Self, CmtaskError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match find_upwards(start, CONFIG_FILE) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let mut config = Self::load_from_path(&path)?;
        if let Some(dir) = path.parent() {
            config.base_dir = relative_to(start, dir);
        }
        Ok(config)
    }
}

/// Express `dir` from `start` when one contains the other
fn relative_to(start: &Path, dir: &Path) -> PathBuf {
    if dir.is_relative() {
        return dir.to_path_buf();
    }
    if let Ok(up) = start.strip_prefix(dir) {
        return up.components().map(|_| Component::ParentDir).collect();
    }
    match dir.strip_prefix(start) {
        Ok(down) => down.to_path_buf(),
        Err(_) => dir.to_path_buf(),
    }
}
