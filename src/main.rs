mod config;
mod db;
mod ipc;
mod models;
mod repo;
mod seed;
mod session;
mod store;
mod token;

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::Config::from_env();

    // stdout carries responses only.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let startup_workspace = config.workspace.clone();
    let in_memory = config.in_memory;
    let mut state = ipc::AppState::new(config);
    if in_memory {
        if let Err(e) = ipc::open_memory_store(&mut state) {
            tracing::error!(error = ?e, "failed to open in-memory store");
        }
    } else if let Some(path) = startup_workspace {
        if let Err(e) = ipc::open_workspace(&mut state, &path) {
            tracing::error!(workspace = %path.display(), error = ?e, "failed to open workspace");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                tracing::warn!(error = %e, "unparseable request line");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
