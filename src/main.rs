//! cmtask - a CMake tasks helper
//!
//! Wraps the three things done most often with a CMake build directory:
//!
//! ```text
//! cmtask config -B build -G "Ninja"   →  cmake -Bbuild -G"Ninja"
//! cmtask build  -B build              →  cmake --build build
//! cmtask delete -B build              →  rm -r build
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod tasks;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::CmtaskError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CmtaskError>() {
                Some(e) => e.display_with_hints(),
                None => eprintln!("\n{} {:#}\n", console::style("ERROR:").red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}
