//! Subprocess execution
//!
//! Two ways to run a [`ToolCommand`]:
//!
//! - [`run_command`] lets the child write straight to the terminal and waits.
//! - [`run_streaming`] pipes stdout and stderr and relays both concurrently,
//!   one thread per pipe, before waiting on the child.

use std::io::{self, Read, Write};
use std::process::{ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::build::ToolCommand;
use crate::error::CmtaskError;
use crate::utils::terminal::StatusSink;
use crate::utils::tools::launch_error;

/// Bytes read from a child pipe per relay step
pub const RELAY_CHUNK_SIZE: usize = 1024;

/// Result of a subprocess execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Execution duration
    pub duration: Duration,
}

impl RunOutcome {
    /// Create a RunOutcome from an exit status
    pub fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            duration,
        }
    }

    /// Short human description of how the child ended
    pub fn describe(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "no exit code (terminated by signal)".to_string(),
        }
    }
}

/// Runs commands on behalf of a task
pub trait CommandRunner {
    /// Run one command to completion, logging around it
    fn run(&self, command: &ToolCommand, sink: &dyn StatusSink) -> Result<RunOutcome, CmtaskError>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    /// Relay output through pipes instead of inheriting the terminal
    pub streaming: bool,
}

impl SystemRunner {
    pub fn new(streaming: bool) -> Self {
        Self { streaming }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand, sink: &dyn StatusSink) -> Result<RunOutcome, CmtaskError> {
        sink.command(&format!("[{}]", command));

        let result = if self.streaming {
            run_streaming(command)
        } else {
            run_command(command)
        };

        if let Ok(outcome) = &result {
            if !outcome.success {
                sink.error(&format!("[{}] finished with {}", command, outcome.describe()));
            }
        }
        sink.separator();

        result
    }
}

/// Run a command with the child's output going straight to the terminal
pub fn run_command(command: &ToolCommand) -> Result<RunOutcome, CmtaskError> {
    let start = Instant::now();

    let status = command
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| launch_error(command.program(), &command.to_string(), e))?;

    Ok(RunOutcome::from_status(status, start.elapsed()))
}

/// Run a command, relaying its output to this process's stdout and stderr
pub fn run_streaming(command: &ToolCommand) -> Result<RunOutcome, CmtaskError> {
    run_streaming_into(command, io::stdout(), io::stderr())
}

/// Run a command, relaying its stdout and stderr into the given writers
///
/// Both relays are joined before the child is waited on, so no output the
/// child wrote before exiting is lost.
pub fn run_streaming_into<O, E>(
    command: &ToolCommand,
    stdout: O,
    stderr: E,
) -> Result<RunOutcome, CmtaskError>
where
    O: Write + Send,
    E: Write + Send,
{
    let start = Instant::now();

    let mut child = command
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| launch_error(command.program(), &command.to_string(), e))?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();

    let (stdout_result, stderr_result) = thread::scope(|scope| {
        let out = scope.spawn(move || match child_stdout {
            Some(pipe) => relay(pipe, stdout),
            None => Ok(0),
        });
        let err = scope.spawn(move || match child_stderr {
            Some(pipe) => relay(pipe, stderr),
            None => Ok(0),
        });
        (join_relay(out), join_relay(err))
    });

    let status = child
        .wait()
        .map_err(|e| CmtaskError::launch(command.program(), e))?;

    stdout_result.map_err(|source| CmtaskError::Relay {
        stream: "stdout",
        source,
    })?;
    stderr_result.map_err(|source| CmtaskError::Relay {
        stream: "stderr",
        source,
    })?;

    Ok(RunOutcome::from_status(status, start.elapsed()))
}

fn join_relay(handle: thread::ScopedJoinHandle<'_, io::Result<u64>>) -> io::Result<u64> {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Copy `reader` into `writer` until end of stream, flushing every chunk
///
/// Returns the number of bytes relayed. The reader is dropped on return,
/// which closes the pipe it wraps.
pub fn relay<R: Read, W: Write>(mut reader: R, mut writer: W) -> io::Result<u64> {
    let mut buf = [0u8; RELAY_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        writer.flush()?;
        total += n as u64;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::utils::terminal::recording::RecordingSink;
    use crate::utils::terminal::Level;

    /// Writer that remembers the size of each write and counts flushes
    #[derive(Default)]
    struct ChunkWriter {
        data: Vec<u8>,
        writes: Vec<usize>,
        flushes: usize,
    }

    impl Write for ChunkWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            self.writes.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_relay_sizes_around_chunk() {
        for len in [0, 1, RELAY_CHUNK_SIZE, 5000] {
            let input = pattern(len);
            let mut out = ChunkWriter::default();
            let copied = relay(Cursor::new(input.clone()), &mut out).unwrap();

            assert_eq!(copied, len as u64);
            assert_eq!(out.data, input);
            assert!(out.writes.iter().all(|&n| n <= RELAY_CHUNK_SIZE));
            assert_eq!(out.flushes, out.writes.len());
        }
    }

    #[test]
    fn test_relay_retries_interrupted_reads() {
        struct Flaky {
            interrupted: bool,
            inner: Cursor<Vec<u8>>,
        }

        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
                }
                self.inner.read(buf)
            }
        }

        let reader = Flaky {
            interrupted: false,
            inner: Cursor::new(b"hello".to_vec()),
        };
        let mut out = Vec::new();
        assert_eq!(relay(reader, &mut out).unwrap(), 5);
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_relay_propagates_write_errors() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = relay(Cursor::new(b"data".to_vec()), Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[cfg(unix)]
    fn numbered(upto: usize) -> Vec<u8> {
        (1..=upto)
            .map(|i| format!("{}\n", i))
            .collect::<String>()
            .into_bytes()
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_keeps_each_stream_in_order() {
        let cmd = ToolCommand::shell("seq 1 2000; seq 1 1500 >&2; seq 2001 2500");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let outcome = run_streaming_into(&cmd, &mut out, &mut err).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(out, numbered(2500));
        assert_eq!(err, numbered(1500));
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_terminates_for_chunk_boundaries() {
        for len in [0usize, RELAY_CHUNK_SIZE, 5000] {
            let cmd = ToolCommand::shell(format!("head -c {} /dev/zero", len));
            let mut out = Vec::new();
            let mut err = Vec::new();

            let outcome = run_streaming_into(&cmd, &mut out, &mut err).unwrap();

            assert!(outcome.success);
            assert_eq!(out.len(), len);
            assert!(out.iter().all(|&b| b == 0));
            assert!(err.is_empty());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_surfaces_nonzero_exit() {
        let cmd = ToolCommand::shell("echo partial; exit 3");
        let mut out = Vec::new();
        let outcome = run_streaming_into(&cmd, &mut out, io::sink()).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.describe(), "exit code 3");
        assert_eq!(out, b"partial\n");
    }

    #[test]
    fn test_streaming_launch_failure() {
        let cmd = ToolCommand::new("cmtask-definitely-not-a-real-tool");
        let err = run_streaming_into(&cmd, io::sink(), io::sink()).unwrap_err();
        assert!(matches!(err, CmtaskError::MissingTool { .. }));
    }

    #[test]
    fn test_sync_launch_failure() {
        let cmd = ToolCommand::new("cmtask-definitely-not-a-real-tool").arg("--build");
        let err = run_command(&cmd).unwrap_err();
        assert!(matches!(err, CmtaskError::MissingTool { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_run_returns_exit_code() {
        let outcome = run_command(&ToolCommand::shell("exit 7")).unwrap();
        assert_eq!(outcome.exit_code, Some(7));
        assert!(!outcome.success);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_logs_command_and_separator() {
        let sink = RecordingSink::default();
        let runner = SystemRunner::new(false);

        let outcome = runner.run(&ToolCommand::shell("exit 0"), &sink).unwrap();

        assert!(outcome.success);
        assert_eq!(sink.lines(Level::Command), vec!["[sh -c \"exit 0\"]"]);
        assert!(sink.lines(Level::Error).is_empty());
        assert_eq!(sink.separators(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_failing_exit_code() {
        let sink = RecordingSink::default();
        let runner = SystemRunner::new(true);

        let outcome = runner.run(&ToolCommand::shell("exit 2"), &sink).unwrap();

        assert_eq!(outcome.exit_code, Some(2));
        assert_eq!(
            sink.lines(Level::Error),
            vec!["[sh -c \"exit 2\"] finished with exit code 2"]
        );
        assert_eq!(sink.separators(), 1);
    }

    #[test]
    fn test_system_runner_separator_after_launch_failure() {
        let sink = RecordingSink::default();
        let result = SystemRunner::default().run(
            &ToolCommand::new("cmtask-definitely-not-a-real-tool"),
            &sink,
        );

        assert!(result.is_err());
        assert_eq!(sink.separators(), 1);
    }
}
