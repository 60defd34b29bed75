//! Running pandoc with per-stream redirection
//!
//! Each standard stream is bound independently. Capturing sinks come in a
//! text and a bytes flavour; the text flavour decodes UTF-8.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// Exit code reported when the process could not be started or ended
/// without an exit code (e.g. killed by a signal)
pub const LAUNCH_FAILED: i32 = -1;

/// Source for the child's stdin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Input {
    #[default]
    Inherit,
    Null,
    Bytes(Vec<u8>),
    Text(String),
}

/// Sink for the child's stdout or stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    #[default]
    Inherit,
    Null,
    /// Capture raw bytes
    Bytes,
    /// Capture and decode as UTF-8
    Text,
}

/// Stream bindings for one invocation
#[derive(Debug, Clone, Default)]
pub struct IoOptions {
    pub stdin: Input,
    pub stdout: Output,
    pub stderr: Output,
}

impl IoOptions {
    /// Null stdin, stdout and stderr captured as text
    pub fn capture() -> Self {
        Self {
            stdin: Input::Null,
            stdout: Output::Text,
            stderr: Output::Text,
        }
    }

    pub fn stdin(mut self, stdin: Input) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn stdout(mut self, stdout: Output) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn stderr(mut self, stderr: Output) -> Self {
        self.stderr = stderr;
        self
    }
}

/// Data captured from one output stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Captured {
    /// Stream was not captured
    #[default]
    None,
    Bytes(Vec<u8>),
    Text(String),
}

impl Captured {
    fn from_output(mode: Output, data: Vec<u8>) -> Self {
        match mode {
            Output::Bytes => Captured::Bytes(data),
            Output::Text => Captured::Text(String::from_utf8_lossy(&data).into_owned()),
            Output::Inherit | Output::Null => Captured::None,
        }
    }

    /// Captured data as text, lossily decoded when captured as bytes
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Captured::None => Cow::Borrowed(""),
            Captured::Bytes(data) => String::from_utf8_lossy(data),
            Captured::Text(text) => Cow::Borrowed(text),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Captured::None => Vec::new(),
            Captured::Bytes(data) => data,
            Captured::Text(text) => text.into_bytes(),
        }
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Process exit code, or [`LAUNCH_FAILED`]
    pub exit_code: i32,
    /// The process started but ended without an exit code (killed by a signal)
    pub signaled: bool,
    pub stdout: Captured,
    pub stderr: Captured,
}

impl RunOutcome {
    fn launch_failure() -> Self {
        Self {
            exit_code: LAUNCH_FAILED,
            signaled: false,
            stdout: Captured::None,
            stderr: Captured::None,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The process could not be started at all
    pub fn launch_failed(&self) -> bool {
        self.exit_code == LAUNCH_FAILED && !self.signaled
    }
}

fn output_stdio(mode: Output) -> Stdio {
    match mode {
        Output::Inherit => Stdio::inherit(),
        Output::Null => Stdio::null(),
        Output::Bytes | Output::Text => Stdio::piped(),
    }
}

/// Runs `bin` with `args`, binding the streams as requested
///
/// Never fails: a process that cannot be started is reported with
/// [`LAUNCH_FAILED`] as exit code.
pub fn run_command(bin: &Path, args: &[String], io: IoOptions) -> RunOutcome {
    let IoOptions {
        stdin,
        stdout,
        stderr,
    } = io;

    let stdin_stdio = match &stdin {
        Input::Inherit => Stdio::inherit(),
        Input::Null => Stdio::null(),
        Input::Bytes(_) | Input::Text(_) => Stdio::piped(),
    };

    let mut child = match Command::new(bin)
        .args(args)
        .stdin(stdin_stdio)
        .stdout(output_stdio(stdout))
        .stderr(output_stdio(stderr))
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(bin = %bin.display(), error = %e, "failed to start pandoc");
            return RunOutcome::launch_failure();
        }
    };

    // Feed stdin on its own thread so a full stdout pipe cannot deadlock us
    let writer = child.stdin.take().and_then(|mut pipe| {
        let data = match stdin {
            Input::Bytes(data) => data,
            Input::Text(text) => text.into_bytes(),
            Input::Inherit | Input::Null => return None,
        };
        Some(thread::spawn(move || pipe.write_all(&data)))
    });

    let output = child.wait_with_output();

    if let Some(writer) = writer {
        match writer.join() {
            Ok(Ok(())) => {}
            // The child may exit without reading all of its input
            Ok(Err(e)) => tracing::debug!(error = %e, "stdin not fully written"),
            Err(_) => tracing::debug!("stdin writer panicked"),
        }
    }

    match output {
        Ok(output) => RunOutcome {
            exit_code: output.status.code().unwrap_or(LAUNCH_FAILED),
            signaled: output.status.code().is_none(),
            stdout: Captured::from_output(stdout, output.stdout),
            stderr: Captured::from_output(stderr, output.stderr),
        },
        Err(e) => {
            tracing::debug!(bin = %bin.display(), error = %e, "failed to wait for pandoc");
            RunOutcome::launch_failure()
        }
    }
}
