//! Execution engine - run the interpreter on one fixture and judge the output

use crate::error::{CoreError, CoreResult};
use crate::fixture::TestCase;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of a single interpreter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Verdict of the comparison against the fixture's expectations
    pub passed: bool,
    /// Everything the child wrote to stdout
    pub stdout: String,
    /// Everything the child wrote to stderr
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal. Informational only.
    pub exit_code: Option<i32>,
    /// Wall time of the invocation. Informational only.
    pub duration: Duration,
}

/// Decide pass/fail from expectations and captured output.
///
/// An `error` expectation takes precedence: when it is present the verdict is
/// stderr equality alone, even if an `out` expectation also exists. Otherwise
/// stdout equality decides. Comparison is exact, nothing is trimmed.
pub fn verdict(
    expected_stdout: Option<&str>,
    expected_stderr: Option<&str>,
    actual_stdout: &str,
    actual_stderr: &str,
) -> bool {
    match (expected_stderr, expected_stdout) {
        (Some(stderr), _) => actual_stderr == stderr,
        (None, Some(stdout)) => actual_stdout == stdout,
        (None, None) => false,
    }
}

/// Runs fixtures against one interpreter executable
///
/// Each call is blocking and sequential. There is no timeout, so a child that
/// never exits hangs the run.
#[derive(Debug, Clone)]
pub struct TestRunner {
    executable: PathBuf,
}

impl TestRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run a single test case
    ///
    /// Spawn failures are fatal for the whole run and surface as
    /// [`CoreError::Spawn`]; a mismatching output is just `passed == false`.
    pub fn run(&self, case: &TestCase) -> CoreResult<Execution> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.executable);
        cmd.arg(&case.source_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if case.stdin_content.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        debug!(
            executable = %self.executable.display(),
            source = %case.source_path.display(),
            "spawning interpreter"
        );
        let mut child = cmd.spawn().map_err(|source| CoreError::Spawn {
            executable: self.executable.clone(),
            source,
        })?;

        // stdin is written while the output pipes drain; the pipe closes when
        // the writer thread drops the handle
        let writer = match (child.stdin.take(), case.stdin_content.clone()) {
            (Some(mut stdin), Some(content)) => Some(thread::spawn(move || {
                stdin.write_all(content.as_bytes())
            })),
            _ => None,
        };

        let output = child.wait_with_output().map_err(|source| CoreError::Wait {
            executable: self.executable.clone(),
            source,
        })?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("interpreter exited before consuming stdin");
                }
                Ok(Err(e)) => warn!("failed to write stdin: {}", e),
                Err(_) => warn!("stdin writer thread panicked"),
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let passed = verdict(
            case.expected_stdout.as_deref(),
            case.expected_stderr.as_deref(),
            &stdout,
            &stderr,
        );

        let duration = start.elapsed();
        debug!(
            dir = %case.directory.display(),
            passed,
            exit_code = ?output.status.code(),
            ?duration,
            "fixture finished"
        );

        Ok(Execution {
            passed,
            stdout,
            stderr,
            exit_code: output.status.code(),
            duration,
        })
    }
}
