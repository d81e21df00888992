use crate::db::SqliteStore;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{respond, to_json};
use crate::ipc::types::{AppState, Request};
use crate::seed::{seed_demo_data, SeedSummary};
use crate::store::{KeyValueStore, MemoryStore};
use serde_json::json;
use std::path::{Path, PathBuf};

fn seed_if_enabled(
    state: &AppState,
    store: &mut dyn KeyValueStore,
) -> anyhow::Result<SeedSummary> {
    if !state.config.seed_demo {
        return Ok(SeedSummary::default());
    }
    Ok(seed_demo_data(store)?)
}

/// Opens (creating if needed) the workspace store and makes it current.
/// Seeds demo fixtures when enabled.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<SeedSummary> {
    let mut store = SqliteStore::open(path)?;
    let seeded = seed_if_enabled(state, &mut store)?;
    tracing::info!(workspace = %path.display(), "workspace opened");
    state.workspace = Some(path.to_path_buf());
    state.store = Some(Box::new(store));
    Ok(seeded)
}

/// Swaps in a process-local store; nothing survives the process.
pub fn open_memory_store(state: &mut AppState) -> anyhow::Result<SeedSummary> {
    let mut store = match state.config.memory_quota {
        0 => MemoryStore::new(),
        quota => MemoryStore::with_quota(quota),
    };
    let seeded = seed_if_enabled(state, &mut store)?;
    tracing::info!(quota = state.config.memory_quota, "in-memory store opened");
    state.workspace = None;
    state.store = Some(Box::new(store));
    Ok(seeded)
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match open_workspace(state, &path) {
        Ok(seeded) => ok(
            &req.id,
            json!({
                "workspacePath": path.to_string_lossy(),
                "seeded": to_json(&seeded),
            }),
        ),
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

fn handle_demo_seed(state: &mut AppState, req: &Request) -> serde_json::Value {
    respond(state, req, |store, _, _| {
        let seeded = seed_demo_data(store)?;
        Ok(json!({ "seeded": seeded }))
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "demo.seed" => Some(handle_demo_seed(state, req)),
        _ => None,
    }
}
