//! Config command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::RunContext;
use crate::utils::terminal::print_verbose;

/// Generate build system files into the build directory
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Build directory
    #[arg(short = 'B', long = "buildpath", env = "BUILD_PATH")]
    pub buildpath: Option<PathBuf>,

    /// CMake generator (e.g. "Ninja", "MinGW Makefiles")
    #[arg(short = 'G', long = "generator", env = "CMAKE_GENERATOR")]
    pub generator: Option<String>,
}

impl ConfigCommand {
    /// Execute the config command
    ///
    /// A configure that cannot start is reported and does not fail the run.
    pub fn execute(self, ctx: &RunContext) -> Result<()> {
        let build_path = ctx.resolve_build_path(self.buildpath)?;
        let generator = ctx.resolve_generator(self.generator);

        let outcome = ctx.tasks().config(&build_path, generator.as_deref());
        if let (true, Some(outcome)) = (ctx.verbose, outcome) {
            print_verbose(&format!(
                "configure finished with {} in {:.2?}",
                outcome.describe(),
                outcome.duration
            ));
        }
        Ok(())
    }
}
