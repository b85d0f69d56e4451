//! Task dispatch: configure, build and delete a CMake build directory
//!
//! [`Tasks`] turns an action into generator commands and hands them to a
//! [`CommandRunner`]. Each action applies its own failure policy:
//!
//! - `config` logs a failed configure and carries on.
//! - `build` configures first when the build directory is missing and treats
//!   a failure there as fatal.
//! - `delete` logs removal failures and never returns an error.

use std::fs;
use std::path::Path;

use crate::build::CMake;
use crate::error::CmtaskError;
use crate::exec::{CommandRunner, RunOutcome};
use crate::utils::paths::{dir_size, format_size};
use crate::utils::terminal::StatusSink;

/// What `delete` did
#[derive(Debug)]
pub enum DeleteReport {
    /// The directory was removed
    Removed { bytes: u64 },
    /// Nothing existed at the path
    Missing,
    /// Removal was attempted and failed
    Failed(CmtaskError),
}

/// Dispatcher for the three build-directory actions
pub struct Tasks<R, S> {
    cmake: CMake,
    runner: R,
    sink: S,
}

impl<R: CommandRunner, S: StatusSink> Tasks<R, S> {
    pub fn new(cmake: CMake, runner: R, sink: S) -> Self {
        Self {
            cmake,
            runner,
            sink,
        }
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the configure command and report exactly what happened
    pub fn configure(
        &self,
        build_dir: &Path,
        generator: Option<&str>,
    ) -> Result<RunOutcome, CmtaskError> {
        let command = self.cmake.configure(build_dir, generator);
        self.runner.run(&command, &self.sink)
    }

    /// Standalone configure: failures are logged, never returned
    pub fn config(&self, build_dir: &Path, generator: Option<&str>) -> Option<RunOutcome> {
        match self.configure(build_dir, generator) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.sink.error(&format!("cmake config error[{}]", e));
                None
            }
        }
    }

    /// Build, configuring first when the build directory does not exist
    pub fn build(
        &self,
        build_dir: &Path,
        generator: Option<&str>,
    ) -> Result<RunOutcome, CmtaskError> {
        if !build_dir.exists() {
            self.configure(build_dir, generator)?;
        }

        let command = self.cmake.build(build_dir);
        self.runner.run(&command, &self.sink)
    }

    /// Remove the build directory if it exists
    pub fn delete(&self, build_dir: &Path) -> DeleteReport {
        let shown = build_dir.display();

        let report = if !build_dir.exists() {
            self.sink.info(&format!(
                "directory [{}] is empty, do not need delete",
                shown
            ));
            DeleteReport::Missing
        } else {
            let bytes = dir_size(build_dir);
            match fs::remove_dir_all(build_dir) {
                Ok(()) => {
                    self.sink.success(&format!(
                        "delete directory [{}] success ({} freed)",
                        shown,
                        format_size(bytes)
                    ));
                    DeleteReport::Removed { bytes }
                }
                Err(e) => {
                    let err = CmtaskError::filesystem(build_dir, e);
                    self.sink
                        .error(&format!("delete directory [{}] error[{}]", shown, err));
                    DeleteReport::Failed(err)
                }
            }
        };

        self.sink.separator();
        report
    }
}
