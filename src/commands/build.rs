//! Build command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::RunContext;
use crate::utils::terminal::print_verbose;

/// Compile the project, configuring first if the build directory is missing
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Build directory
    #[arg(short = 'B', long = "buildpath", env = "BUILD_PATH")]
    pub buildpath: Option<PathBuf>,

    /// CMake generator, used only when a configure is needed
    #[arg(short = 'G', long = "generator", env = "CMAKE_GENERATOR")]
    pub generator: Option<String>,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(self, ctx: &RunContext) -> Result<()> {
        let build_path = ctx.resolve_build_path(self.buildpath)?;
        let generator = ctx.resolve_generator(self.generator);

        let outcome = ctx.tasks().build(&build_path, generator.as_deref())?;
        if ctx.verbose {
            print_verbose(&format!(
                "build finished with {} in {:.2?}",
                outcome.describe(),
                outcome.duration
            ));
        }
        Ok(())
    }
}
