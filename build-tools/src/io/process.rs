//! Helpers for running child processes and capturing their output.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, instrument};
use wait_timeout::ChildExt;

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    /// `None` waits for the child indefinitely.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Build a spec from an argv whose first element is the program.
    pub fn from_argv(argv: &[String], workdir: impl Into<PathBuf>) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("command must not be empty"))?;
        if program.trim().is_empty() {
            bail!("command program must not be blank");
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            workdir: workdir.into(),
            timeout: None,
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the argv for messages, e.g. `git lfs pull`.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured child process result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// The limit that elapsed when the child had to be killed.
    pub timed_out: Option<Duration>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.timed_out.is_none() && self.code == Some(0)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs external commands.
///
/// `Err` means the invocation itself failed (the program could not be spawned
/// or waited on). A non-zero exit is reported through [`CommandOutput::code`].
pub trait ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        run_command(spec)
    }
}

/// How long to keep collecting output once the child is gone (or killed).
///
/// Grandchildren that inherited the pipes can hold them open past the child's
/// exit; their readers are abandoned after this grace period.
pub const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Run a command to completion and capture stdout/stderr without risking pipe deadlocks.
///
/// Output is read concurrently while the child runs. If `spec.timeout` elapses the
/// child is killed and the result carries the elapsed limit in `timed_out`. With a
/// timeout set, the whole call is bounded by the timeout plus [`DRAIN_GRACE`], even
/// when descendants of the child keep the output pipes open. Without one, the call
/// waits for the child and every pipe holder.
#[instrument(
    skip_all,
    fields(command = %spec.display(), timeout_secs = spec.timeout.map(|t| t.as_secs()))
)]
pub fn run_command(spec: &CommandSpec) -> Result<CommandOutput> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let started = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            debug!(err = %e, "failed to spawn command");
            return Err(e).with_context(|| format!("spawn {}", spec.display()));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_reader = StreamReader::spawn(stdout);
    let stderr_reader = StreamReader::spawn(stderr);

    let (status, timed_out) = wait_child(&mut child, spec.timeout)?;

    let drain_deadline = match (spec.timeout, timed_out) {
        (None, _) => None,
        (Some(_), Some(_)) => Some(Instant::now() + DRAIN_GRACE),
        (Some(limit), None) => Some(started + limit + DRAIN_GRACE),
    };
    let stdout = stdout_reader.collect(drain_deadline).context("collect stdout")?;
    let stderr = stderr_reader.collect(drain_deadline).context("collect stderr")?;

    debug!(exit_code = ?status.code(), timed_out = timed_out.is_some(), "command finished");
    Ok(CommandOutput {
        code: status.code(),
        stdout,
        stderr,
        timed_out,
    })
}

fn wait_child(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<(ExitStatus, Option<Duration>)> {
    let Some(timeout) = timeout else {
        let status = child.wait().context("wait for command")?;
        return Ok((status, None));
    };
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok((status, None)),
        None => {
            debug!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill().context("kill command")?;
            let status = child.wait().context("wait command after kill")?;
            Ok((status, Some(timeout)))
        }
    }
}

/// Background reader draining one child pipe into a shared buffer.
///
/// The buffer is shared so output read before an abandoned reader stalls is
/// still returned.
struct StreamReader {
    buf: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<Result<()>>,
}

impl StreamReader {
    fn spawn<R: Read + Send + 'static>(reader: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            // The receiver is gone once the reader was abandoned.
            let _ = tx.send(read_stream(reader, &sink));
        });
        Self { buf, done }
    }

    /// Wait for EOF (until `deadline`, if any) and return what was read.
    fn collect(self, deadline: Option<Instant>) -> Result<Vec<u8>> {
        let finished = match deadline {
            None => self
                .done
                .recv()
                .map_err(|_| anyhow!("output reader thread panicked")),
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match self.done.recv_timeout(wait) {
                    Ok(result) => Ok(result),
                    Err(RecvTimeoutError::Timeout) => {
                        debug!("output pipe still held open, abandoning reader");
                        Ok(Ok(()))
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        Err(anyhow!("output reader thread panicked"))
                    }
                }
            }
        };
        finished??;
        let mut buf = self
            .buf
            .lock()
            .map_err(|_| anyhow!("output buffer poisoned"))?;
        Ok(std::mem::take(&mut *buf))
    }
}

fn read_stream<R: Read>(mut reader: R, sink: &Mutex<Vec<u8>>) -> Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            return Ok(());
        }
        sink.lock()
            .map_err(|_| anyhow!("output buffer poisoned"))?
            .extend_from_slice(&chunk[..n]);
    }
}
