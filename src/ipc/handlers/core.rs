use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{DaemonState, Request};
use crate::model::STATE_KEY;
use crate::store::{SqliteSlot, StateStore};
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let updated_at = state
        .store
        .as_ref()
        .and_then(|s| s.slot_updated_at().ok().flatten());
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "stateKey": STATE_KEY,
            "stateUpdatedAt": updated_at,
        }),
    )
}

/// Opens the workspace database and loads the stored state into a fresh store.
pub fn select_workspace(state: &mut DaemonState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let store = StateStore::open(Box::new(SqliteSlot::new(conn)));
    tracing::info!(
        workspace = %path.display(),
        grades = store.state().grades.len(),
        "workspace selected"
    );
    state.workspace = Some(path.to_path_buf());
    state.store = Some(store);
    Ok(())
}

fn handle_workspace_select(state: &mut DaemonState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match select_workspace(state, &path) {
        Ok(()) => ok(&req.id, json!({ "workspacePath": path.to_string_lossy() })),
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut DaemonState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
