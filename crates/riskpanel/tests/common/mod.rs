//! Common test utilities shared across integration tests.
//!
//! [`CannedServer`] is an `axum` app on its own runtime thread. Every request
//! falls through to one handler closure that picks the response, and the
//! server records what it received. That is enough to exercise the real
//! `reqwest` client and the binary without a backend.

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A request as seen by [`CannedServer`]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    /// First header with this name, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Request body is not JSON")
    }
}

type Handler = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct Shared {
    requests: Arc<Mutex<Vec<Recorded>>>,
    handler: Arc<Handler>,
}

/// Canned-response HTTP server bound to an ephemeral local port
pub struct CannedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl CannedServer {
    /// Start serving; `handler` returns the status and JSON body for each request.
    ///
    /// The server runs on a dedicated thread so it keeps answering while a
    /// test blocks on the binary.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            requests: Arc::clone(&requests),
            handler: Arc::new(handler),
        };
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build test server runtime");

            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind test server");
                let addr = listener.local_addr().expect("Failed to read local address");
                addr_tx.send(addr).expect("Test server owner went away");

                let app = Router::new().fallback(record).with_state(shared);
                let server = tokio::spawn(async move {
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            shutdown_rx.await.ok();
                        })
                        .await
                });
                server
                    .await
                    .expect("Test server task panicked")
                    .expect("Test server failed");
            });
        });

        let addr = addr_rx.recv().expect("Test server did not start");
        Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Base URL to point a client at
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Address the server listens on
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("Request log poisoned").clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }
    }
}

/// Fallback for every route: record the request, answer from the handler.
async fn record(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let request = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    };

    let (status, body) = (shared.handler)(&request);
    shared
        .requests
        .lock()
        .expect("Request log poisoned")
        .push(request);

    let status = StatusCode::from_u16(status).expect("Handler returned an invalid status");
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Two records for project `p1`: an open issue and a closed risk
pub fn sample_records() -> String {
    serde_json::json!([
        {
            "id": 1,
            "type": "issue",
            "title": "Login outage",
            "description": "SSO provider down",
            "impact_level": "high",
            "status": "open",
            "project_id": "p1",
            "created_at": "2026-03-02T10:00:00Z"
        },
        {
            "id": "r-2",
            "type": "risk",
            "title": "Vendor may slip",
            "description": null,
            "impact_level": "low",
            "status": "closed"
        }
    ])
    .to_string()
}

/// Handler for a small backend holding [`sample_records`]
pub fn sample_backend(request: &Recorded) -> (u16, String) {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/projects/p1/risks-issues") => (200, sample_records()),
        ("PUT", path) if path.starts_with("/api/risks-issues/") => (200, request.body.clone()),
        ("POST", "/api/projects/p1/risks-issues") => {
            let mut created = request.json();
            created["id"] = serde_json::json!(99);
            created["status"] = serde_json::json!("open");
            (201, created.to_string())
        }
        _ => (404, r#"{"error":"Not found"}"#.to_string()),
    }
}

/// Path of the binary under test
pub fn riskpanel_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_riskpanel"))
}

/// A command for the binary, isolated from the caller's environment
pub fn riskpanel_command(dir: &Path) -> Command {
    let mut command = Command::new(riskpanel_binary());
    command
        .current_dir(dir)
        .env("RISKPANEL_TOKEN", "test-token")
        .env("NO_COLOR", "1")
        .env_remove("RISKPANEL_API_URL")
        .env_remove("RUST_LOG");
    command
}

/// Run the binary in `dir` against the backend at `api_url`
pub fn run_riskpanel(dir: &Path, api_url: &str, args: &[&str]) -> Output {
    riskpanel_command(dir)
        .arg("--api-url")
        .arg(api_url)
        .args(args)
        .output()
        .expect("Failed to execute riskpanel binary")
}
