// src/exec/process.rs

//! Subprocess description and synchronous runner.
//!
//! A [`Process`] is always an argument vector; there is no shell string form
//! and nothing is passed through `sh -c`. Running drives the child on a
//! private current-thread `tokio` runtime so that stdout streaming, stderr
//! collection, stdin feeding and the timeout all progress together while the
//! caller simply blocks.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::console::input::escape_token;
use crate::errors::{AdditionsError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    argv: Vec<String>,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
    input: Option<String>,
    timeout: Option<Duration>,
}

/// What is left after a process finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl Process {
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        match argv.first() {
            None => Err(AdditionsError::InvalidShellCommand(
                "argument vector must not be empty".to_string(),
            )),
            Some(program) if program.trim().is_empty() => Err(AdditionsError::InvalidShellCommand(
                "program name must not be blank".to_string(),
            )),
            Some(_) => Ok(Self {
                argv,
                cwd: None,
                env: BTreeMap::new(),
                input: None,
                timeout: None,
            }),
        }
    }

    pub fn current_dir(&mut self, cwd: impl AsRef<Path>) -> &mut Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Add a variable on top of the inherited environment.
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    /// Data written to the child's stdin.
    pub fn input(&mut self, input: impl Into<String>) -> &mut Self {
        self.input = Some(input.into());
        self
    }

    /// Limit the run time. A zero duration disables the limit.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn command_line(&self) -> String {
        self.argv
            .iter()
            .map(|arg| escape_token(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, feeding every stdout chunk to `on_stdout` as it
    /// arrives. An error from the callback aborts the run and kills the child.
    ///
    /// Inside a tokio runtime the child is driven from a worker thread and
    /// `on_stdout` keeps running on the calling thread.
    #[cfg(feature = "process")]
    pub fn run<F>(&self, on_stdout: F) -> Result<ProcessOutcome>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return self.run_on_worker(on_stdout);
        }
        self.block_on(on_stdout)
    }

    #[cfg(feature = "process")]
    fn block_on<F>(&self, on_stdout: F) -> Result<ProcessOutcome>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_async(on_stdout))
    }

    #[cfg(feature = "process")]
    fn run_on_worker<F>(&self, mut on_stdout: F) -> Result<ProcessOutcome>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        use std::sync::mpsc;

        let (tx, rx) = mpsc::channel::<Vec<u8>>();

        std::thread::scope(|scope| {
            let worker = scope.spawn(move || {
                self.block_on(|chunk: &[u8]| {
                    tx.send(chunk.to_vec())
                        .map_err(|_| AdditionsError::Other(anyhow::anyhow!("stdout consumer stopped")))
                })
            });

            // Dropping the receiver on a callback error makes the worker's
            // next send fail, which stops and kills the child.
            let mut callback_error = None;
            for chunk in rx {
                if let Err(err) = on_stdout(&chunk) {
                    callback_error = Some(err);
                    break;
                }
            }

            let outcome = worker
                .join()
                .map_err(|_| AdditionsError::Other(anyhow::anyhow!("process worker thread panicked")))?;
            match callback_error {
                Some(err) => Err(err),
                None => outcome,
            }
        })
    }

    #[cfg(not(feature = "process"))]
    pub fn run<F>(&self, _on_stdout: F) -> Result<ProcessOutcome>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        Err(AdditionsError::MissingProcessCapability)
    }

    #[cfg(feature = "process")]
    async fn run_async<F>(&self, mut on_stdout: F) -> Result<ProcessOutcome>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        use std::process::Stdio;

        use anyhow::Context;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::process::Command;
        use tracing::{debug, info, warn};

        let command_line = self.command_line();
        info!(cmd = %command_line, cwd = ?self.cwd, "starting process");

        let mut cmd = Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..])
            .envs(&self.env)
            .stdin(if self.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process '{command_line}'"))?;

        // Feed stdin concurrently so a child that writes before reading
        // cannot deadlock against us.
        let stdin_task = match (child.stdin.take(), self.input.clone()) {
            (Some(mut stdin), Some(input)) => Some(tokio::spawn(async move {
                let res = stdin.write_all(input.as_bytes()).await;
                drop(stdin);
                res
            })),
            _ => None,
        };

        // Always consume stderr so the pipe never fills up.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf).await.map(|_| buf)
            })
        });

        let mut stdout = child.stdout.take();
        let drive = async {
            if let Some(stdout) = stdout.as_mut() {
                let mut buf = [0u8; 8192];
                loop {
                    let n = stdout.read(&mut buf).await?;
                    if n == 0 {
                        break;
                    }
                    on_stdout(&buf[..n])?;
                }
            }
            let status = child.wait().await?;
            Ok::<_, AdditionsError>(status)
        };

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, drive).await {
                Ok(res) => res?,
                Err(_) => {
                    warn!(cmd = %command_line, timeout = ?limit, "process timed out; killing it");
                    if let Err(e) = child.kill().await {
                        warn!(cmd = %command_line, error = %e, "failed to kill timed out process");
                    }
                    return Err(AdditionsError::ProcessTimedOut {
                        command: command_line,
                        timeout: limit,
                    });
                }
            },
            None => drive.await?,
        };

        if let Some(task) = stdin_task {
            match task.await.context("joining stdin writer")? {
                Ok(()) => {}
                // A child may exit without reading all of its input.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(cmd = %command_line, "child closed stdin early");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let stderr = match stderr_task {
            Some(task) => task.await.context("joining stderr reader")??,
            None => Vec::new(),
        };

        let exit_code = status.code();
        info!(
            cmd = %command_line,
            exit_code = ?exit_code,
            success = status.success(),
            "process exited"
        );

        Ok(ProcessOutcome {
            exit_code,
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}
