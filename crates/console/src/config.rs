use std::path::{Path, PathBuf};
use std::time::Duration;

/// Local-development backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default managed-secrets file consulted before the environment.
const DEFAULT_SECRETS_FILE: &str = "secrets.env";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the remote backend, resolved via [`resolve_backend_url`].
    pub backend_url: String,
    /// Timeout for backend probe calls in seconds (default: `15`).
    pub backend_timeout_secs: u64,
    /// Test-suite command for the admin runner page (default: `pytest -q`).
    pub test_command: Vec<String>,
    /// Repository root the suite runs in; `tests/` is expected under it.
    pub repo_root: PathBuf,
    /// Maximum wall-clock seconds for one suite run (default: `600`).
    pub test_timeout_secs: u64,
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `127.0.0.1`                |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `BACKEND_URL`          | see [`resolve_backend_url`]|
    /// | `BACKEND_TIMEOUT_SECS` | `15`                       |
    /// | `TEST_COMMAND`         | `pytest -q`                |
    /// | `REPO_ROOT`            | `.`                        |
    /// | `TEST_TIMEOUT_SECS`    | `600`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let backend_timeout_secs: u64 = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("BACKEND_TIMEOUT_SECS must be a valid u64");

        let test_command: Vec<String> = std::env::var("TEST_COMMAND")
            .unwrap_or_else(|_| "pytest -q".into())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let repo_root = PathBuf::from(std::env::var("REPO_ROOT").unwrap_or_else(|_| ".".into()));

        let test_timeout_secs: u64 = std::env::var("TEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("TEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            backend_url: resolve_backend_url(),
            backend_timeout_secs,
            test_command,
            repo_root,
            test_timeout_secs,
        }
    }

    /// Timeout applied to each backend probe call.
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

/// Resolve the backend base URL. Never fails.
///
/// Precedence, first non-empty wins:
/// 1. `BACKEND_URL` in the managed-secrets file (dotenv format, path from
///    `MKTLAB_SECRETS_FILE`, default `secrets.env`) -- an unreadable file
///    or absent key is skipped silently;
/// 2. the `BACKEND_URL` environment variable;
/// 3. [`DEFAULT_BACKEND_URL`].
///
/// Trailing slash(es) are stripped from any discovered value.
pub fn resolve_backend_url() -> String {
    let secrets_file =
        std::env::var("MKTLAB_SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.into());
    let secret = read_secret(Path::new(&secrets_file), "BACKEND_URL");
    let env = std::env::var("BACKEND_URL").ok();
    resolve_backend_url_from(secret, env)
}

/// Precedence and normalization, separated from the I/O sources.
fn resolve_backend_url_from(secret: Option<String>, env: Option<String>) -> String {
    [secret, env]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

/// Read one key from a dotenv-format secrets file without touching the
/// process environment. Any failure yields `None`.
fn read_secret(path: &Path, key: &str) -> Option<String> {
    let iter = dotenvy::from_filename_iter(path).ok()?;
    for item in iter {
        let Ok((k, v)) = item else { continue };
        if k == key {
            return Some(v);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
