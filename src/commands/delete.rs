//! Delete command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::RunContext;
use crate::tasks::DeleteReport;
use crate::utils::terminal::print_verbose;

/// Delete the build directory
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Build directory
    #[arg(short = 'B', long = "buildpath", env = "BUILD_PATH")]
    pub buildpath: Option<PathBuf>,
}

impl DeleteCommand {
    /// Execute the delete command
    ///
    /// Removal failures are logged; the command itself still succeeds.
    pub fn execute(self, ctx: &RunContext) -> Result<()> {
        let build_path = ctx.resolve_build_path(self.buildpath)?;

        let report = ctx.tasks().delete(&build_path);
        if ctx.verbose {
            match report {
                DeleteReport::Removed { bytes } => {
                    print_verbose(&format!("{} bytes removed", bytes))
                }
                DeleteReport::Missing => print_verbose("nothing to remove"),
                DeleteReport::Failed(err) => print_verbose(&format!("removal failed: {:?}", err)),
            }
        }
        Ok(())
    }
}
