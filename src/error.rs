//! Error types and helpers for user-friendly error messages
//!
//! Every failure a task can hit is one of these variants. Callers decide per
//! action whether a variant is fatal or only worth a log line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum CmtaskError {
    /// The child process could not be started
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// Removing a directory failed
    #[error("Failed to remove '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Relaying a child output stream failed
    #[error("Failed to relay child {stream}: {source}")]
    Relay {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    /// Configuration file or setting errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        hint: Option<String>,
    },
}

impl CmtaskError {
    /// Create a launch error
    pub fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a filesystem error
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a configuration error with a hint
    pub fn config_error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            CmtaskError::MissingTool {
                hint, required_for, ..
            } => {
                eprintln!("  required for: {}", required_for);
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            CmtaskError::Config { hint: Some(h), .. } => {
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
            }
            _ => {}
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake\n\
         \n\
         Or point cmtask at another executable with --cmake or CMTASK_CMAKE."
    }

    /// Get hint for a missing build path
    pub fn build_path() -> &'static str {
        "No build directory was given. Provide one of:\n\
         • -B <path> on the command line\n\
         • the BUILD_PATH environment variable\n\
         • build_path under [cmake] in cmtask.toml"
    }

    /// Get hint for an invalid cmtask.toml
    pub fn invalid_config() -> &'static str {
        "cmtask.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Unknown keys (only [cmake] program/build_path/generator and [output] stream are allowed)"
    }
}
