//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.
//! Values left unset on the command line fall back to the environment (via
//! clap), then to cmtask.toml.

pub mod build;
pub mod config;
pub mod delete;

use std::path::PathBuf;

use crate::build::{CMake, DEFAULT_CMAKE};
use crate::config::CmtaskConfig;
use crate::error::{hints, CmtaskError};
use crate::exec::SystemRunner;
use crate::tasks::Tasks;
use crate::utils::terminal::{print_verbose, ConsoleSink};
use crate::utils::tools::check_tool;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Generator executable given on the command line or in the environment
    pub cmake: Option<String>,
    /// Relay child output through pipes
    pub stream: bool,
    /// Print resolved settings
    pub verbose: bool,
    /// Loaded cmtask.toml (defaults when absent)
    pub config: CmtaskConfig,
}

impl RunContext {
    /// Generator executable after applying the config fallback
    pub fn cmake_program(&self) -> String {
        self.cmake
            .clone()
            .or_else(|| self.config.cmake.program.clone())
            .unwrap_or_else(|| DEFAULT_CMAKE.to_string())
    }

    /// Build directory after applying the config fallback
    ///
    /// Flag and environment values are relative to the working directory;
    /// a value from cmtask.toml is relative to the file.
    pub fn resolve_build_path(&self, arg: Option<PathBuf>) -> Result<PathBuf, CmtaskError> {
        arg.or_else(|| self.config.build_path())
            .ok_or_else(|| {
                CmtaskError::config_error_with_hint("no build directory given", hints::build_path())
            })
    }

    /// Generator name after applying the config fallback
    pub fn resolve_generator(&self, arg: Option<String>) -> Option<String> {
        arg.or_else(|| self.config.cmake.generator.clone())
    }

    /// Whether the streaming runner is used
    pub fn streaming(&self) -> bool {
        self.stream || self.config.output.stream
    }

    /// Dispatcher wired to real processes and the terminal
    pub fn tasks(&self) -> Tasks<SystemRunner, ConsoleSink> {
        let program = self.cmake_program();

        if self.verbose {
            match check_tool(&program) {
                Some(info) => print_verbose(&format!(
                    "using {} at {} ({})",
                    info.name,
                    info.path.display(),
                    info.version.as_deref().unwrap_or("unknown version")
                )),
                None => print_verbose(&format!("'{}' was not found on PATH", program)),
            }
            print_verbose(&format!(
                "output mode: {}",
                if self.streaming() { "streaming" } else { "inherited" }
            ));
        }

        Tasks::new(
            CMake::new(program),
            SystemRunner::new(self.streaming()),
            ConsoleSink,
        )
    }
}
