//! One-shot JSON-over-stdio process runner.

use conductor_domain::core::string::truncate_str;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Maximum bytes of stderr quoted back in an error.
const STDERR_EXCERPT_BYTES: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Program not found: {0}")]
    NotFound(String),

    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("'{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("I/O error talking to '{program}': {message}")]
    Io { program: String, message: String },
}

/// A program plus its arguments, working directory and deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandSpec {
    /// Build from an argv-style list. The first element is the program.
    ///
    /// The program must resolve on `PATH` (or be a path to an existing file).
    pub fn from_argv(argv: &[String]) -> Result<Self, ProcessError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(ProcessError::NotFound(String::new()));
        };
        if which::which(program).is_err() {
            return Err(ProcessError::NotFound(program.clone()));
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: None,
            timeout: None,
        })
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run once with `payload` serialized on stdin; return trimmed stdout.
    ///
    /// The child is killed if the deadline passes or the returned future is
    /// dropped.
    pub async fn run_json<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, ProcessError> {
        let input = serde_json::to_vec(payload).map_err(|e| self.io_error(e))?;

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.run_with_input(&input))
                .await
                .map_err(|_| ProcessError::Timeout {
                    program: self.program.clone(),
                    timeout,
                })?,
            None => self.run_with_input(&input).await,
        }
    }

    async fn run_with_input(&self, input: &[u8]) -> Result<String, ProcessError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        // Write stdin while stdout and stderr are drained so no pipe fills up
        let stdin = child.stdin.take();
        let write_input = async move {
            if let Some(mut stdin) = stdin {
                // A child that ignores its input may close stdin early
                if let Err(e) = stdin.write_all(input).await {
                    debug!("'{}' did not read its input: {}", self.program, e);
                }
            }
        };
        let ((), output) = tokio::join!(write_input, child.wait_with_output());
        let output = output.map_err(|e| self.io_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: truncate_str(stderr.trim(), STDERR_EXCERPT_BYTES).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn io_error(&self, e: impl std::fmt::Display) -> ProcessError {
        ProcessError::Io {
            program: self.program.clone(),
            message: e.to_string(),
        }
    }
}
