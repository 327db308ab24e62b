//! Admin page that runs the backend test suite and reports its output.

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use mktlab_core::error::CoreError;
use mktlab_core::testrun::{run_suite, SuiteError, SuiteOutcome, SuiteSpec};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `GET /admin/tests`.
#[derive(Debug, Serialize)]
pub struct RunnerStatus {
    /// Repository root the suite runs in.
    pub repo_root: String,
    /// Expected tests directory under the repo root.
    pub tests_dir: String,
    /// Whether the tests directory exists; the run action is only offered
    /// when it does.
    pub available: bool,
    /// The command the runner will execute.
    pub command: Vec<String>,
}

/// Result body for `POST /admin/tests/run`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Whether the suite exited with code 0.
    pub passed: bool,
    pub exit_code: i32,
    /// Combined stdout + stderr.
    pub output: String,
    pub duration_ms: u64,
}

impl From<SuiteOutcome> for RunReport {
    fn from(outcome: SuiteOutcome) -> Self {
        Self {
            passed: outcome.passed,
            exit_code: outcome.exit_code,
            output: outcome.output,
            duration_ms: outcome.duration_ms,
        }
    }
}

/// GET /admin/tests -- runner status (admin only).
pub async fn status(
    State(state): State<AppState>,
    RequireAdmin(_session): RequireAdmin,
) -> Json<DataResponse<RunnerStatus>> {
    let tests_dir = tests_dir(&state);

    Json(DataResponse {
        data: RunnerStatus {
            repo_root: state.config.repo_root.display().to_string(),
            tests_dir: tests_dir.display().to_string(),
            available: tests_dir.is_dir(),
            command: state.config.test_command.clone(),
        },
    })
}

/// POST /admin/tests/run -- execute the suite (admin only).
///
/// Refuses when the tests directory is missing. A missing runner binary
/// maps to the actionable install message; timeouts and I/O failures
/// surface with their own messages.
pub async fn run(
    State(state): State<AppState>,
    RequireAdmin(_session): RequireAdmin,
) -> AppResult<Json<DataResponse<RunReport>>> {
    if !tests_dir(&state).is_dir() {
        return Err(AppError::Core(CoreError::NotFound(
            "No se encontró la carpeta `tests/` en la raíz del proyecto.".to_string(),
        )));
    }

    let (program, args) = state
        .config
        .test_command
        .split_first()
        .ok_or_else(|| AppError::InternalError("TEST_COMMAND is empty".to_string()))?;

    let spec = SuiteSpec {
        program: program.clone(),
        args: args.to_vec(),
        repo_root: state.config.repo_root.clone(),
        timeout: Duration::from_secs(state.config.test_timeout_secs),
    };

    tracing::info!(command = ?state.config.test_command, "Running test suite");

    let outcome = run_suite(&spec).await.map_err(|e| match e {
        SuiteError::ToolMissing { .. } => AppError::Core(CoreError::NotFound(e.to_string())),
        other => AppError::RunFailed(other.to_string()),
    })?;

    tracing::info!(
        passed = outcome.passed,
        exit_code = outcome.exit_code,
        duration_ms = outcome.duration_ms,
        "Test suite finished"
    );

    Ok(Json(DataResponse {
        data: RunReport::from(outcome),
    }))
}

/// The tests directory checked before a run is offered or started.
fn tests_dir(state: &AppState) -> PathBuf {
    state.config.repo_root.join("tests")
}
