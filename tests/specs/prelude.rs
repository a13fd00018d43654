//! Shared helpers for CLI specs
//!
//! `Project` is a throwaway project directory with its own user config
//! home; `FakePlatform` is a local management API the CLI can deploy to.

#![allow(dead_code)]

use assert_cmd::Command;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use predicates::prelude::*;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Output;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const CLEARED_ENV: &[&str] = &[
    "CHD_LOG",
    "CLOUDHUB_URL",
    "CLOUDHUB_USERNAME",
    "CLOUDHUB_PASSWORD",
    "CLOUDHUB_DOMAIN",
    "CLOUDHUB_ENVIRONMENT",
    "CLOUDHUB_MULE_VERSION",
    "CLOUDHUB_WORKERS",
    "CLOUDHUB_MAX_WAIT_MS",
];

/// A temporary project directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Write a packaged application archive
    pub fn artifact(&self, rel: &str) {
        self.file(rel, "PK\u{3}\u{4}application");
    }

    /// Write the user credentials file
    pub fn credentials(&self, content: &str) {
        self.file(".config/chd/credentials.toml", content);
    }

    /// The CLI, run from the project root with an isolated environment
    pub fn chd(&self) -> Cli {
        let mut cmd = Command::cargo_bin("chd").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("HOME", self.path());
        for var in CLEARED_ENV {
            cmd.env_remove(var);
        }
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and assert exit code 0
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\n{}",
            run.output.status.code(),
            run.describe()
        );
        run
    }

    /// Run and assert the given non-zero exit code
    pub fn fails_with(mut self, code: i32) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "unexpected exit code\n{}",
            run.describe()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn stdout_has(&self, expected: &str) -> &Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stdout()),
            "stdout missing {:?}\n{}",
            expected,
            self.describe()
        );
        self
    }

    pub fn stdout_eq(&self, expected: &str) -> &Self {
        assert_eq!(self.stdout(), expected, "\n{}", self.describe());
        self
    }

    pub fn stderr_has(&self, expected: &str) -> &Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stderr()),
            "stderr missing {:?}\n{}",
            expected,
            self.describe()
        );
        self
    }

    fn describe(&self) -> String {
        format!(
            "--- stdout ---\n{}\n--- stderr ---\n{}",
            self.stdout(),
            self.stderr()
        )
    }
}

// =============================================================================
// Fake management API
// =============================================================================

#[derive(Clone, Default)]
struct PlatformState {
    statuses: Arc<Mutex<VecDeque<String>>>,
    last_status: Arc<Mutex<String>>,
    reject_credentials: Arc<Mutex<bool>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl PlatformState {
    fn record(&self, request: String) -> Result<(), StatusCode> {
        self.requests.lock().unwrap().push(request);
        if *self.reject_credentials.lock().unwrap() {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(())
    }
}

/// Management API on 127.0.0.1 serving scripted deployment statuses
pub struct FakePlatform {
    url: String,
    state: PlatformState,
    // Owns the server task
    _runtime: tokio::runtime::Runtime,
}

impl FakePlatform {
    /// Report each status in turn, then keep reporting the last one
    pub fn with_statuses(statuses: &[&str]) -> Self {
        let state = PlatformState::default();
        *state.statuses.lock().unwrap() = statuses.iter().map(|s| s.to_string()).collect();
        *state.last_status.lock().unwrap() = "UNDEPLOYED".to_string();

        let app = Router::new()
            .route("/api/applications/{domain}/deploy", post(upload))
            .route("/api/applications/{domain}", put(configure))
            .route("/api/applications/{domain}/status", post(start))
            .route(
                "/api/applications/{domain}/deployments/{id}",
                get(deployment_status),
            )
            .with_state(state.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        runtime.spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
            _runtime: runtime,
        }
    }

    pub fn rejecting_credentials() -> Self {
        let platform = Self::with_statuses(&["STARTED"]);
        *platform.state.reject_credentials.lock().unwrap() = true;
        platform
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests received so far, e.g. `upload:orders`
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// A `cloudhub.toml` pointing at this platform
    pub fn config(&self, extra: &str) -> String {
        format!(
            r#"[cloudhub]
url = "{}"
username = "deployer"
password = "s3cret"
domain = "orders"

{}"#,
            self.url, extra
        )
    }
}

async fn upload(
    State(state): State<PlatformState>,
    UrlPath(domain): UrlPath<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.record(format!("upload:{}", domain))?;
    Ok(Json(serde_json::json!({ "artifactId": "artifact-1" })))
}

async fn configure(
    State(state): State<PlatformState>,
    UrlPath(domain): UrlPath<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode, StatusCode> {
    state.record(format!(
        "configure:{}:{}:{}",
        domain,
        body["muleVersion"].as_str().unwrap_or_default(),
        body["workers"]
    ))?;
    Ok(StatusCode::OK)
}

async fn start(
    State(state): State<PlatformState>,
    UrlPath(domain): UrlPath<String>,
) -> Result<StatusCode, StatusCode> {
    state.record(format!("start:{}", domain))?;
    Ok(StatusCode::OK)
}

async fn deployment_status(
    State(state): State<PlatformState>,
    UrlPath((domain, id)): UrlPath<(String, String)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.record(format!("status:{}:{}", domain, id))?;
    let next = state.statuses.lock().unwrap().pop_front();
    let mut last = state.last_status.lock().unwrap();
    if let Some(status) = next {
        *last = status;
    }
    Ok(Json(serde_json::json!({ "status": last.clone() })))
}
