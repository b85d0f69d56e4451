//! Terminal output utilities
//!
//! Status lines are `<timestamp>: <message>`, colored by category. Tasks talk
//! to a [`StatusSink`] so the console can be swapped for a recorder in tests.

use chrono::Local;
use console::{style, StyledObject};

/// Width of the separator printed after each command or deletion
pub const SEPARATOR_WIDTH: usize = 49;

/// Category of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A command about to run
    Command,
    /// Neutral information
    Info,
    /// Something completed as asked
    Success,
    /// Something failed
    Error,
}

/// Destination for status lines
pub trait StatusSink {
    /// Emit one status line
    fn status(&self, level: Level, message: &str);

    /// Emit a separator line
    fn separator(&self);

    fn command(&self, message: &str) {
        self.status(Level::Command, message);
    }

    fn info(&self, message: &str) {
        self.status(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.status(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.status(Level::Error, message);
    }
}

/// Local time with millisecond precision, e.g. `2024-05-01 13:37:00.042`
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Prefix a message with the current timestamp
pub fn stamped(message: &str) -> String {
    format!("{}: {}", timestamp(), message)
}

fn styled(level: Level, text: &str) -> StyledObject<&str> {
    let styled = style(text);
    match level {
        Level::Command => styled.magenta(),
        Level::Info => styled.blue(),
        Level::Success => styled.green(),
        Level::Error => styled.red(),
    }
}

/// Apply the color for a level
pub fn paint(level: Level, text: &str) -> String {
    styled(level, text).to_string()
}

/// Status sink that prints to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn status(&self, level: Level, message: &str) {
        println!("{}", paint(level, &stamped(message)));
    }

    fn separator(&self) {
        println!("{}", paint(Level::Command, &"-".repeat(SEPARATOR_WIDTH)));
    }
}

/// Print an error line without a timestamp
pub fn print_error(message: &str) {
    println!("{}", paint(Level::Error, message));
}

/// Print a verbose diagnostic line to stderr
pub fn print_verbose(message: &str) {
    eprintln!("{} {}", style("verbose:").cyan().bold(), message);
}

/// Enable or disable colors on both output streams
pub fn set_colors(enabled: bool) {
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

#[cfg(test)]
pub mod recording {
    use std::cell::RefCell;

    use super::{Level, StatusSink};

    /// One recorded entry
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Entry {
        Line(Level, String),
        Separator,
    }

    /// Sink that keeps every line in memory
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        entries: RefCell<Vec<Entry>>,
    }

    impl RecordingSink {
        pub fn lines(&self, level: Level) -> Vec<String> {
            self.entries
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Entry::Line(l, msg) if *l == level => Some(msg.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn separators(&self) -> usize {
            self.entries
                .borrow()
                .iter()
                .filter(|e| matches!(e, Entry::Separator))
                .count()
        }
    }

    impl StatusSink for RecordingSink {
        fn status(&self, level: Level, message: &str) {
            self.entries
                .borrow_mut()
                .push(Entry::Line(level, message.to_string()));
        }

        fn separator(&self) {
            self.entries.borrow_mut().push(Entry::Separator);
        }
    }
}
