//! Test-suite subprocess runner backing the admin runner page.
//!
//! Spawns the configured suite command in the repository root, captures
//! combined stdout/stderr, and enforces a wall-clock timeout. A missing
//! runner binary is reported as its own error so the page can show an
//! actionable install message instead of a raw I/O error.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Maximum bytes captured per output stream.
///
/// Output beyond this limit is truncated to keep a runaway suite from
/// exhausting memory.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Placeholder reported when the suite produced no output at all.
const NO_OUTPUT_PLACEHOLDER: &str = "Sin salida del test runner (stdout/stderr vacíos).";

/// A configured test-suite invocation.
#[derive(Debug, Clone)]
pub struct SuiteSpec {
    /// Program to execute (e.g. `pytest`).
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Directory the suite runs in (the repository root).
    pub repo_root: PathBuf,
    /// Maximum wall-clock time before the run is killed.
    pub timeout: Duration,
}

/// Captured result of a finished suite run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SuiteOutcome {
    /// Combined stdout + stderr, in that order.
    pub output: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the run exited with code 0.
    pub passed: bool,
}

/// Errors from a suite invocation.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// The configured runner binary is not installed.
    #[error("No se pudo ejecutar `{program}`. Verificá que esté instalado en el entorno.")]
    ToolMissing { program: String },

    /// The run exceeded its timeout and was killed.
    #[error("La ejecución de tests superó el tiempo límite ({elapsed_ms}ms).")]
    Timeout { elapsed_ms: u64 },

    /// Spawning or reading the process failed.
    #[error("Error inesperado al ejecutar tests: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the configured suite and capture its combined output.
///
/// The run is considered passed iff the process exits with code 0; a
/// non-zero exit is still a successful *invocation* and is reported in the
/// outcome, not as an error.
pub async fn run_suite(spec: &SuiteSpec) -> Result<SuiteOutcome, SuiteError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.repo_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // The child is killed when dropped (e.g. on timeout).
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SuiteError::ToolMissing {
                program: spec.program.clone(),
            }
        } else {
            SuiteError::Io(e)
        }
    })?;

    // Read stdout/stderr in spawned tasks so `child.wait()` (which borrows
    // `&mut child`) can run concurrently.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    let wait_result = tokio::time::timeout(spec.timeout, child.wait()).await;

    match wait_result {
        Ok(Ok(status)) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            let stdout = String::from_utf8_lossy(&stdout_task.await.unwrap_or_default()).into_owned();
            let stderr = String::from_utf8_lossy(&stderr_task.await.unwrap_or_default()).into_owned();

            let mut output = format!("{stdout}\n{stderr}");
            if output.trim().is_empty() {
                output = NO_OUTPUT_PLACEHOLDER.to_string();
            }

            let exit_code = status.code().unwrap_or(-1);
            Ok(SuiteOutcome {
                output,
                exit_code,
                duration_ms,
                passed: exit_code == 0,
            })
        }
        Ok(Err(e)) => Err(SuiteError::Io(e)),
        Err(_elapsed) => {
            // Timeout expired; dropping `child` kills the process.
            Err(SuiteError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
