//! CMake command construction
//!
//! Generator invocations are kept as an explicit program plus argument list.
//! The shell-like string form only exists for display in the status log.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Default generator executable
pub const DEFAULT_CMAKE: &str = "cmake";

/// A single external command, ready to run
///
/// The program is started directly with its argument list; nothing passes
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a command for a program with no arguments yet
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Run a raw line through the platform shell
    #[cfg(test)]
    pub fn shell(line: impl Into<String>) -> Self {
        if cfg!(windows) {
            Self::new("cmd").arg("/C").arg(line)
        } else {
            Self::new("sh").arg("-c").arg(line)
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name used for launch and error messages
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments as they are handed to the program
    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// Build the `std::process::Command` for this invocation
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", display_arg(arg))?;
        }
        Ok(())
    }
}

/// Render an argument the way a user would type it
///
/// Generator flags keep the `-G"<name>"` form; other arguments are quoted
/// only when they contain whitespace.
fn display_arg(arg: &str) -> String {
    if let Some(generator) = arg.strip_prefix("-G") {
        return format!("-G\"{}\"", generator);
    }
    if arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// CMake command builder bound to one executable
#[derive(Debug, Clone)]
pub struct CMake {
    program: String,
}

impl Default for CMake {
    fn default() -> Self {
        Self::new(DEFAULT_CMAKE)
    }
}

impl CMake {
    /// Create a builder for the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `<cmake> -B<build_dir> -G"<generator>"`
    ///
    /// Without a generator, `-G` is left out and CMake picks its default.
    pub fn configure(&self, build_dir: &Path, generator: Option<&str>) -> ToolCommand {
        let cmd = ToolCommand::new(&self.program).arg(format!("-B{}", build_dir.display()));
        match generator {
            Some(generator) => cmd.arg(format!("-G{}", generator)),
            None => cmd,
        }
    }

    /// `<cmake> --build <build_dir>`
    pub fn build(&self, build_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("--build")
            .arg(build_dir.display().to_string())
    }
}
