//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    build::BuildCommand, config::ConfigCommand, delete::DeleteCommand, RunContext,
};
use crate::config::CmtaskConfig;
use crate::utils::terminal::{print_error, print_verbose, set_colors};

/// cmtask - CMake tasks helper
///
/// Configure, build and delete a CMake build directory.
#[derive(Parser, Debug)]
#[command(name = "cmtask")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// CMake executable to invoke
    #[arg(long, global = true, env = "CMTASK_CMAKE")]
    pub cmake: Option<String>,

    /// Relay child output through pipes instead of sharing the terminal
    #[arg(long, global = true)]
    pub stream: bool,

    /// Path to cmtask.toml (searched upward from the current directory by default)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// cmake config - generate build system files
    Config(ConfigCommand),

    /// cmake build - compile the project
    Build(BuildCommand),

    /// delete cmake build directory
    Delete(DeleteCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            set_colors(false);
        }

        let Some(command) = self.command else {
            print_error("args error!");
            return Ok(());
        };

        let cwd = std::env::current_dir()?;
        let config = CmtaskConfig::discover(self.config_file.as_deref(), &cwd)?;
        if self.verbose {
            print_verbose(&format!("configuration: {:?}", config));
        }

        let ctx = RunContext {
            cmake: self.cmake,
            stream: self.stream,
            verbose: self.verbose,
            config,
        };

        match command {
            Commands::Config(cmd) => cmd.execute(&ctx),
            Commands::Build(cmd) => cmd.execute(&ctx),
            Commands::Delete(cmd) => cmd.execute(&ctx),
        }
    }
}
