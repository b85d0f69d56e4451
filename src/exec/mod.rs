//! Process execution

pub mod subprocess;

pub use subprocess::{CommandRunner, RunOutcome, SystemRunner};
